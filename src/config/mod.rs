//! Configuration management for chado-gff.
//!
//! chado-gff reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CHADO_GFF_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation once at load time
//!
//! The loaded [`ChadoGffConfig`] is immutable and passed by reference to every
//! pipeline component.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chado_gff::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("chado-gff.toml")?;
//!
//! println!("Queue: {}", config.queue.name);
//! println!("Scripts: {}", config.scripts_path().display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [tools]
//! writedb_entry = "/software/pathogen/projects/artemis/current/etc/writedb_entry"
//! gt = "/software/pathogen/external/apps/usr/local/genometools-1.5.9/bin/gt"
//!
//! [export]
//! slice_size = 10
//! target_path = "/lustre/scratch118/infgen/pathdev/chado-gff"
//!
//! [queue]
//! backend = "lsf"
//! name = "basement"
//!
//! [database]
//! host = "pathdbsrv1"
//! dbname = "pathogens"
//! user = "genedb_ro"
//! password = "${CHADO_GFF_DB_PASSWORD}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ChadoGffConfig, DatabaseConfig, ExportConfig, LoggingConfig, QueueBackend,
    QueueConfig, ToolsConfig, TrackingConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
