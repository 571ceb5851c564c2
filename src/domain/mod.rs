//! Domain models and types for chado-gff.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrganismId`])
//! - **Domain models** ([`Chunk`])
//! - **Error types** ([`ChadoGffError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ChadoGffError>`]:
//!
//! ```rust
//! use chado_gff::domain::{OrganismId, ChadoGffError, Result};
//!
//! fn parse(raw: &str) -> Result<OrganismId> {
//!     OrganismId::new(raw).map_err(ChadoGffError::Validation)
//! }
//!
//! assert!(parse("Smansoni").is_ok());
//! assert!(parse("").is_err());
//! ```

pub mod chunk;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use chunk::{
    chunk_name, parse_script_file_name, parse_status_file_name, script_file_name,
    status_file_name, Chunk, MAX_CHUNKS,
};
pub use errors::ChadoGffError;
pub use ids::{OrganismId, OrganismList};
pub use result::Result;
