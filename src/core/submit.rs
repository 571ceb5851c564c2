//! Job submission
//!
//! [`JobSubmitter`] turns a generated script into a [`QueueRequest`] and hands
//! it to the configured [`JobQueue`]. With submission disabled the script is
//! left on disk and reported as [`JobHandle::NotSubmitted`].

use crate::adapters::queue::JobQueue;
use crate::core::script::JobScript;
use crate::core::workspace::Workspace;
use crate::domain::{chunk_name, ChadoGffError, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Prefix of every scheduler job name
pub const JOB_NAME_PREFIX: &str = "chado-gff";

/// Backend reference for a submitted chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobHandle {
    /// Accepted by a batch scheduler
    Queued { job_id: String },
    /// Already executed on this host
    Local { exit_code: Option<i32> },
    /// Submission disabled; script written only
    NotSubmitted,
}

impl JobHandle {
    /// Whether the tracker should wait for a status marker
    pub fn is_submitted(&self) -> bool {
        !matches!(self, Self::NotSubmitted)
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued { job_id } => write!(f, "job {job_id}"),
            Self::Local { exit_code: Some(code) } => write!(f, "local (exit {code})"),
            Self::Local { exit_code: None } => write!(f, "local (killed)"),
            Self::NotSubmitted => write!(f, "not submitted"),
        }
    }
}

/// Everything a backend needs besides the script itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRequest {
    pub queue_name: String,
    pub job_name: String,
    pub stdout: PathBuf,
    pub stderr: PathBuf,
    pub memory_mb: Option<u64>,
}

/// Submits generated scripts to a queue
pub struct JobSubmitter {
    queue: Arc<dyn JobQueue>,
    queue_name: String,
    memory_mb: Option<u64>,
    enabled: bool,
}

impl JobSubmitter {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        queue_name: impl Into<String>,
        memory_mb: Option<u64>,
        enabled: bool,
    ) -> Self {
        Self {
            queue,
            queue_name: queue_name.into(),
            memory_mb,
            enabled,
        }
    }

    /// Builds the request for a script's chunk
    pub fn request_for(&self, script: &JobScript, workspace: &Workspace) -> QueueRequest {
        QueueRequest {
            queue_name: self.queue_name.clone(),
            job_name: format!("{JOB_NAME_PREFIX}-{}", chunk_name(script.chunk_index)),
            stdout: workspace.stdout_log_path(script.chunk_index),
            stderr: workspace.stderr_log_path(script.chunk_index),
            memory_mb: self.memory_mb,
        }
    }

    /// Submits one script
    ///
    /// # Errors
    ///
    /// Returns [`ChadoGffError::Submission`] for the script's chunk when the
    /// backend fails. Errors from the backend that are not already attributed
    /// to a chunk are wrapped.
    pub async fn submit(&self, script: &JobScript, workspace: &Workspace) -> Result<JobHandle> {
        if !self.enabled {
            tracing::debug!(chunk_index = script.chunk_index, "Submission disabled");
            return Ok(JobHandle::NotSubmitted);
        }

        let request = self.request_for(script, workspace);
        self.queue
            .submit(script, &request)
            .await
            .map_err(|e| match e {
                ChadoGffError::Submission { .. } => e,
                other => ChadoGffError::submission(script.chunk_index, other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingQueue {
        requests: Mutex<Vec<QueueRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl JobQueue for RecordingQueue {
        fn backend(&self) -> &'static str {
            "recording"
        }

        async fn submit(&self, _script: &JobScript, request: &QueueRequest) -> Result<JobHandle> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ChadoGffError::Io("queue offline".to_string()));
            }
            Ok(JobHandle::Queued {
                job_id: "101".to_string(),
            })
        }
    }

    fn script(index: usize) -> JobScript {
        JobScript {
            chunk_index: index,
            path: PathBuf::from(format!("/run/scripts/chunk_{index:05}.sh")),
            organism_count: 3,
        }
    }

    #[tokio::test]
    async fn test_submit_builds_request() {
        let queue = Arc::new(RecordingQueue::default());
        let submitter = JobSubmitter::new(queue.clone(), "basement", Some(2000), true);

        let handle = submitter
            .submit(&script(2), &Workspace::at("/run"))
            .await
            .unwrap();

        assert_eq!(
            handle,
            JobHandle::Queued {
                job_id: "101".to_string()
            }
        );
        let requests = queue.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].queue_name, "basement");
        assert_eq!(requests[0].job_name, "chado-gff-chunk_00002");
        assert_eq!(requests[0].stdout, PathBuf::from("/run/logs/chunk_00002.out"));
        assert_eq!(requests[0].memory_mb, Some(2000));
    }

    #[tokio::test]
    async fn test_disabled_submitter_never_calls_queue() {
        let queue = Arc::new(RecordingQueue::default());
        let submitter = JobSubmitter::new(queue.clone(), "basement", None, false);

        let handle = submitter
            .submit(&script(0), &Workspace::at("/run"))
            .await
            .unwrap();

        assert_eq!(handle, JobHandle::NotSubmitted);
        assert!(!handle.is_submitted());
        assert!(queue.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_is_attributed_to_chunk() {
        let queue = Arc::new(RecordingQueue {
            fail: true,
            ..Default::default()
        });
        let submitter = JobSubmitter::new(queue, "basement", None, true);

        let err = submitter
            .submit(&script(3), &Workspace::at("/run"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChadoGffError::Submission { chunk_index: 3, .. }));
        assert!(err.to_string().contains("queue offline"));
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(
            JobHandle::Queued {
                job_id: "7".to_string()
            }
            .to_string(),
            "job 7"
        );
        assert_eq!(JobHandle::Local { exit_code: Some(0) }.to_string(), "local (exit 0)");
        assert_eq!(JobHandle::NotSubmitted.to_string(), "not submitted");
    }
}
