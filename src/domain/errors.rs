//! Domain error types
//!
//! This module defines the error hierarchy for chado-gff. Run-level errors
//! (configuration, workspace) abort before any chunk work begins; chunk-level
//! errors always carry the index of the chunk they belong to.

use thiserror::Error;

/// Main chado-gff error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum ChadoGffError {
    /// Missing or invalid required settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Workspace directories could not be created or are unusable
    #[error("Workspace error: {0}")]
    Workspace(String),

    /// A job script could not be rendered or written
    #[error("Generation error for chunk {chunk_index}: {message}")]
    Generation { chunk_index: usize, message: String },

    /// The queue rejected a job script
    #[error("Submission error for chunk {chunk_index}: {message}")]
    Submission { chunk_index: usize, message: String },

    /// The organism list could not be obtained
    #[error("Organism source error: {0}")]
    Source(String),

    /// Chado database errors
    #[error("Database error: {0}")]
    Database(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ChadoGffError {
    /// Creates a generation error for a chunk
    pub fn generation(chunk_index: usize, message: impl Into<String>) -> Self {
        Self::Generation {
            chunk_index,
            message: message.into(),
        }
    }

    /// Creates a submission error for a chunk
    pub fn submission(chunk_index: usize, message: impl Into<String>) -> Self {
        Self::Submission {
            chunk_index,
            message: message.into(),
        }
    }

    /// Chunk index this error is attributed to, if any
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            Self::Generation { chunk_index, .. } | Self::Submission { chunk_index, .. } => {
                Some(*chunk_index)
            }
            _ => None,
        }
    }

    /// Process exit code reported when this error ends a run
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Validation(_) => 2,
            Self::Workspace(_) => 3,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ChadoGffError {
    fn from(err: std::io::Error) -> Self {
        ChadoGffError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ChadoGffError {
    fn from(err: serde_json::Error) -> Self {
        ChadoGffError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ChadoGffError {
    fn from(err: toml::de::Error) -> Self {
        ChadoGffError::Configuration(format!("TOML parse error: {err}"))
    }
}
