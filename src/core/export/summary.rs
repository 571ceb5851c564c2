//! Run summary and reporting
//!
//! This module defines structures for tracking and reporting the result of a
//! run, chunk by chunk.

use crate::core::submit::JobHandle;
use crate::core::tracker::ChunkOutcome;
use crate::domain::{ChadoGffError, OrganismId, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Exit code when the run was interrupted by a signal
pub const EXIT_INTERRUPTED: i32 = 130;

/// Per-chunk entry of a [`RunSummary`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkReport {
    /// Organisms in the chunk, kept so failed chunks can be re-targeted
    pub organisms: Vec<OrganismId>,

    /// Queue handle, if the chunk got that far
    pub handle: Option<JobHandle>,

    /// Terminal outcome
    #[serde(flatten)]
    pub outcome: ChunkOutcome,
}

/// Summary of an export run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Wall-clock start time
    pub started_at: DateTime<Utc>,

    /// Duration of the run
    pub duration: Duration,

    /// Scripts were generated but not submitted
    pub dry_run: bool,

    /// Tracking stopped early because shutdown was requested
    pub interrupted: bool,

    /// Number of organisms obtained from the source
    pub total_organisms: usize,

    /// Per-chunk breakdown, keyed by chunk index
    pub chunks: BTreeMap<usize, ChunkReport>,

    /// Errors encountered during the run
    pub errors: Vec<RunError>,
}

impl RunSummary {
    /// Create a new empty run summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            dry_run,
            interrupted: false,
            total_organisms: 0,
            chunks: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: RunError) {
        self.errors.push(error);
    }

    /// Records a chunk's terminal state
    pub fn record_chunk(
        &mut self,
        chunk_index: usize,
        organisms: Vec<OrganismId>,
        handle: Option<JobHandle>,
        outcome: ChunkOutcome,
    ) {
        self.chunks.insert(
            chunk_index,
            ChunkReport {
                organisms,
                handle,
                outcome,
            },
        );
    }

    /// Number of chunks with the given outcome kind
    fn count(&self, pred: impl Fn(&ChunkOutcome) -> bool) -> usize {
        self.chunks.values().filter(|c| pred(&c.outcome)).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ChunkOutcome::Success))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ChunkOutcome::Failure { .. }))
    }

    pub fn timed_out(&self) -> usize {
        self.count(|o| matches!(o, ChunkOutcome::TimedOut))
    }

    /// Indices of chunks that did not succeed, in order
    pub fn unsuccessful_chunks(&self) -> Vec<usize> {
        self.chunks
            .iter()
            .filter(|(_, report)| !self.chunk_ok(&report.outcome))
            .map(|(index, _)| *index)
            .collect()
    }

    fn chunk_ok(&self, outcome: &ChunkOutcome) -> bool {
        match outcome {
            ChunkOutcome::Success => true,
            ChunkOutcome::NotSubmitted => self.dry_run,
            ChunkOutcome::Failure { .. } | ChunkOutcome::TimedOut => false,
        }
    }

    /// Check if the run was successful
    ///
    /// Every chunk must have succeeded. In a dry run every chunk must have had
    /// its script generated. A run with no chunks is successful.
    pub fn is_successful(&self) -> bool {
        !self.interrupted
            && self.chunks.values().all(|c| self.chunk_ok(&c.outcome))
    }

    /// Process exit code for this run
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.is_successful() {
            0
        } else {
            1
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            total_organisms = self.total_organisms,
            chunks = self.chunks.len(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            timed_out = self.timed_out(),
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            "Export run completed"
        );

        let unsuccessful = self.unsuccessful_chunks();
        if !unsuccessful.is_empty() {
            tracing::warn!(
                chunk_count = unsuccessful.len(),
                chunks = ?unsuccessful,
                "Some chunks did not succeed"
            );
        }
        for error in &self.errors {
            tracing::warn!(
                error_type = ?error.error_type,
                chunk_index = ?error.chunk_index,
                message = %error.message,
                "Run error"
            );
        }
    }

    /// Writes the summary as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| {
            ChadoGffError::Io(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

/// Type of run error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunErrorType {
    /// The queue rejected a chunk
    Submission,
    /// The summary or another run artifact could not be written
    Io,
}

/// Run error with the chunk it belongs to, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunError {
    pub error_type: RunErrorType,
    pub message: String,
    pub chunk_index: Option<usize>,
}

impl From<&ChadoGffError> for RunError {
    fn from(err: &ChadoGffError) -> Self {
        let error_type = match err {
            ChadoGffError::Submission { .. } => RunErrorType::Submission,
            _ => RunErrorType::Io,
        };
        Self {
            error_type,
            message: err.to_string(),
            chunk_index: err.chunk_index(),
        }
    }
}
