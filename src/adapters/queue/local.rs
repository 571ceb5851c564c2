//! Runs job scripts on the current host

use super::JobQueue;
use crate::core::script::JobScript;
use crate::core::submit::{JobHandle, QueueRequest};
use crate::domain::{ChadoGffError, Result};
use async_trait::async_trait;
use std::fs::File;
use std::process::Stdio;
use tokio::process::Command;

/// Executes each script with `bash` and waits for it to exit
///
/// The script still writes its own status marker, so tracking behaves the
/// same as with a real scheduler.
#[derive(Debug, Clone, Default)]
pub struct LocalQueue;

impl LocalQueue {
    pub fn new() -> Self {
        Self
    }
}

fn open_log(chunk_index: usize, path: &std::path::Path) -> Result<File> {
    File::create(path).map_err(|e| {
        ChadoGffError::submission(
            chunk_index,
            format!("failed to open {}: {}", path.display(), e),
        )
    })
}

#[async_trait]
impl JobQueue for LocalQueue {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn submit(&self, script: &JobScript, request: &QueueRequest) -> Result<JobHandle> {
        let stdout = open_log(script.chunk_index, &request.stdout)?;
        let stderr = open_log(script.chunk_index, &request.stderr)?;

        let status = Command::new("bash")
            .arg(&script.path)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()
            .await
            .map_err(|e| {
                ChadoGffError::submission(script.chunk_index, format!("failed to start bash: {e}"))
            })?;

        tracing::debug!(
            chunk_index = script.chunk_index,
            exit_code = ?status.code(),
            "Local job finished"
        );

        Ok(JobHandle::Local {
            exit_code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(dir: &std::path::Path) -> QueueRequest {
        QueueRequest {
            queue_name: "local".to_string(),
            job_name: "chado-gff-chunk_00000".to_string(),
            stdout: dir.join("chunk_00000.out"),
            stderr: dir.join("chunk_00000.err"),
            memory_mb: None,
        }
    }

    #[tokio::test]
    async fn test_runs_script_and_captures_output() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("chunk_00000.sh");
        fs::write(&path, "echo hello\necho oops >&2\nexit 3\n").unwrap();
        let script = JobScript {
            chunk_index: 0,
            path,
            organism_count: 1,
        };

        let handle = LocalQueue::new()
            .submit(&script, &request(temp.path()))
            .await
            .unwrap();

        assert_eq!(handle, JobHandle::Local { exit_code: Some(3) });
        assert_eq!(
            fs::read_to_string(temp.path().join("chunk_00000.out")).unwrap(),
            "hello\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("chunk_00000.err")).unwrap(),
            "oops\n"
        );
    }

    #[tokio::test]
    async fn test_unwritable_log_is_submission_error() {
        let temp = TempDir::new().unwrap();
        let script = JobScript {
            chunk_index: 5,
            path: temp.path().join("chunk_00005.sh"),
            organism_count: 1,
        };

        let err = LocalQueue::new()
            .submit(&script, &request(&temp.path().join("missing")))
            .await
            .unwrap_err();

        assert!(matches!(err, ChadoGffError::Submission { chunk_index: 5, .. }));
    }
}
