//! Logging and observability
//!
//! Structured logging with:
//! - Configurable log levels (`RUST_LOG` wins over configuration)
//! - Console output
//! - Optional JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use chado_gff::logging::init_logging;
//! use chado_gff::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(chunk_index = 0, "Chunk submitted");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a successful chunk submission
///
/// # Example
///
/// ```no_run
/// use chado_gff::log_chunk_submitted;
///
/// log_chunk_submitted!(3, "12345");
/// ```
#[macro_export]
macro_rules! log_chunk_submitted {
    ($chunk_index:expr, $handle:expr) => {
        tracing::info!(
            chunk_index = $chunk_index,
            handle = %$handle,
            "Chunk submitted"
        );
    };
}

/// Log the terminal outcome of a chunk
///
/// # Example
///
/// ```no_run
/// use chado_gff::log_chunk_outcome;
///
/// log_chunk_outcome!(3, "success");
/// ```
#[macro_export]
macro_rules! log_chunk_outcome {
    ($chunk_index:expr, $outcome:expr) => {
        tracing::info!(
            chunk_index = $chunk_index,
            outcome = %$outcome,
            "Chunk reached terminal state"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use chado_gff::log_error_with_context;
/// use chado_gff::domain::ChadoGffError;
///
/// let error = ChadoGffError::Workspace("not writable".to_string());
/// log_error_with_context!(&error, "Failed to prepare workspace");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
