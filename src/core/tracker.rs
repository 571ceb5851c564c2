//! Status tracking
//!
//! Each job script writes `status/chunk_NNNNN.status` when it ends. The
//! tracker polls those markers until every submitted chunk has one, the
//! timeout elapses, or shutdown is requested.
//!
//! Marker content:
//!
//! | content            | meaning                |
//! |--------------------|------------------------|
//! | missing or empty   | still running          |
//! | `0`                | success                |
//! | any other integer  | failure with that code |
//! | anything else      | failure (unreadable)   |

use crate::core::submit::JobHandle;
use crate::domain::status_file_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Terminal state of a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChunkOutcome {
    Success,
    Failure { reason: String },
    /// No marker appeared before the deadline; the real outcome is unknown
    TimedOut,
    /// Dry run: the script was written and never submitted
    NotSubmitted,
}

impl ChunkOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ChunkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure { reason } => write!(f, "failure ({reason})"),
            Self::TimedOut => write!(f, "timed out"),
            Self::NotSubmitted => write!(f, "not submitted"),
        }
    }
}

/// What a single read of a status marker found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerState {
    Pending,
    Exited(i32),
    Unreadable(String),
}

impl MarkerState {
    /// Terminal outcome for this marker, or `None` while pending
    pub fn outcome(&self) -> Option<ChunkOutcome> {
        match self {
            Self::Pending => None,
            Self::Exited(0) => Some(ChunkOutcome::Success),
            Self::Exited(code) => Some(ChunkOutcome::failure(format!("exit status {code}"))),
            Self::Unreadable(detail) => Some(ChunkOutcome::failure(format!(
                "unreadable status marker: {detail}"
            ))),
        }
    }
}

/// Reads one status marker
///
/// A marker that is absent, empty, or not yet readable counts as pending so
/// that polling tolerates jobs that have not started.
pub async fn read_marker(path: &Path) -> MarkerState {
    match fs::read(path).await {
        Ok(bytes) => parse_marker(&bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => MarkerState::Pending,
        Err(e) => {
            tracing::debug!(marker = %path.display(), error = %e, "Status marker not readable yet");
            MarkerState::Pending
        }
    }
}

/// Interprets the contents of a status marker
pub fn parse_marker(content: &[u8]) -> MarkerState {
    let text = String::from_utf8_lossy(content);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return MarkerState::Pending;
    }
    match trimmed.parse::<i32>() {
        Ok(code) => MarkerState::Exited(code),
        Err(_) => MarkerState::Unreadable(format!("{trimmed:?}")),
    }
}

/// Single non-blocking pass over the markers of `chunk_indices`
pub async fn scan(status_dir: &Path, chunk_indices: &[usize]) -> BTreeMap<usize, MarkerState> {
    let mut states = BTreeMap::new();
    for &index in chunk_indices {
        let state = read_marker(&status_dir.join(status_file_name(index))).await;
        states.insert(index, state);
    }
    states
}

/// Result of [`StatusTracker::await_completion`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingReport {
    pub outcomes: BTreeMap<usize, ChunkOutcome>,
    pub interrupted: bool,
}

impl TrackingReport {
    /// Success only when every chunk succeeded
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.values().all(ChunkOutcome::is_success)
    }
}

/// Polls status markers for submitted chunks
#[derive(Debug, Clone)]
pub struct StatusTracker {
    status_dir: PathBuf,
    poll_interval: Duration,
    timeout: Duration,
}

impl StatusTracker {
    pub fn new(status_dir: impl Into<PathBuf>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            status_dir: status_dir.into(),
            poll_interval,
            timeout,
        }
    }

    fn marker_path(&self, chunk_index: usize) -> PathBuf {
        self.status_dir.join(status_file_name(chunk_index))
    }

    /// Waits until every handle reaches a terminal outcome
    ///
    /// Handles for jobs that already ran on this host resolve without
    /// polling, as do [`JobHandle::NotSubmitted`] handles. When `shutdown`
    /// flips to `true` the chunks still pending are reported as
    /// [`ChunkOutcome::TimedOut`] and the report is marked interrupted.
    pub async fn await_completion(
        &self,
        handles: &[(usize, JobHandle)],
        mut shutdown: watch::Receiver<bool>,
    ) -> TrackingReport {
        let mut outcomes = BTreeMap::new();
        let mut pending = Vec::new();

        for (index, handle) in handles {
            match handle {
                JobHandle::NotSubmitted => {
                    outcomes.insert(*index, ChunkOutcome::NotSubmitted);
                }
                JobHandle::Local { exit_code } => {
                    let outcome = read_marker(&self.marker_path(*index))
                        .await
                        .outcome()
                        .unwrap_or_else(|| local_fallback(*exit_code));
                    outcomes.insert(*index, outcome);
                }
                JobHandle::Queued { .. } => pending.push(*index),
            }
        }

        let deadline = Instant::now() + self.timeout;
        let mut interrupted = false;
        let mut watching = true;

        tracing::info!(
            pending = pending.len(),
            poll_interval_secs = self.poll_interval.as_secs_f64(),
            timeout_secs = self.timeout.as_secs_f64(),
            "Tracking submitted chunks"
        );

        loop {
            let mut still_pending = Vec::with_capacity(pending.len());
            for index in pending {
                match read_marker(&self.marker_path(index)).await.outcome() {
                    Some(outcome) => {
                        tracing::info!(chunk_index = index, outcome = %outcome, "Chunk finished");
                        outcomes.insert(index, outcome);
                    }
                    None => still_pending.push(index),
                }
            }
            pending = still_pending;

            if pending.is_empty() {
                break;
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(pending = pending.len(), "Timed out waiting for status markers");
                break;
            }

            if *shutdown.borrow() {
                tracing::warn!(pending = pending.len(), "Shutdown already requested, stopping tracking");
                interrupted = true;
                break;
            }

            let wake = std::cmp::min(now + self.poll_interval, deadline);
            if watching {
                tokio::select! {
                    _ = sleep_until(wake) => {}
                    changed = shutdown.changed() => match changed {
                        Ok(()) if *shutdown.borrow() => {
                            tracing::warn!(pending = pending.len(), "Shutdown requested, stopping tracking");
                            interrupted = true;
                            break;
                        }
                        Ok(()) => {}
                        // Sender gone: keep polling without a cancellation source
                        Err(_) => watching = false,
                    },
                }
            } else {
                sleep_until(wake).await;
            }
        }

        for index in pending {
            outcomes.insert(index, ChunkOutcome::TimedOut);
        }

        TrackingReport {
            outcomes,
            interrupted,
        }
    }
}

fn local_fallback(exit_code: Option<i32>) -> ChunkOutcome {
    match exit_code {
        Some(0) => ChunkOutcome::failure("job exited 0 without writing a status marker"),
        Some(code) => ChunkOutcome::failure(format!("exit status {code}")),
        None => ChunkOutcome::failure("terminated by signal"),
    }
}
