//! Export orchestration
//!
//! - [`coordinator`] drives a run from organism source to tracked outcomes
//! - [`summary`] collects per-chunk results and the run-level verdict

pub mod coordinator;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use summary::{ChunkReport, RunError, RunErrorType, RunSummary, EXIT_INTERRUPTED};
