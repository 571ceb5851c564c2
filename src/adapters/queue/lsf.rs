//! LSF submission through `bsub`

use super::JobQueue;
use crate::core::script::JobScript;
use crate::core::submit::{JobHandle, QueueRequest};
use crate::domain::{ChadoGffError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::ffi::OsString;
use std::sync::OnceLock;
use tokio::process::Command;

/// Submits scripts to LSF with `bsub`
#[derive(Debug, Clone)]
pub struct LsfQueue {
    bsub_path: String,
}

impl LsfQueue {
    pub fn new(bsub_path: impl Into<String>) -> Self {
        Self {
            bsub_path: bsub_path.into(),
        }
    }

    /// Argument vector passed to `bsub` for a script
    pub fn bsub_args(script: &JobScript, request: &QueueRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-q".into(),
            request.queue_name.clone().into(),
            "-J".into(),
            request.job_name.clone().into(),
            "-o".into(),
            request.stdout.clone().into_os_string(),
            "-e".into(),
            request.stderr.clone().into_os_string(),
        ];
        if let Some(mem) = request.memory_mb {
            args.push("-M".into());
            args.push(mem.to_string().into());
            args.push("-R".into());
            args.push(format!("select[mem>{mem}] rusage[mem={mem}]").into());
        }
        args.push(script.path.clone().into_os_string());
        args
    }
}

fn job_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Job <(\d+)> is submitted to (?:default )?queue").expect("bsub pattern is a valid regex")
    })
}

/// Extracts the job id from `bsub` output such as
/// `Job <4242> is submitted to queue <basement>.`
pub fn parse_job_id(output: &str) -> Option<String> {
    job_id_pattern()
        .captures(output)
        .map(|caps| caps[1].to_string())
}

#[async_trait]
impl JobQueue for LsfQueue {
    fn backend(&self) -> &'static str {
        "lsf"
    }

    async fn submit(&self, script: &JobScript, request: &QueueRequest) -> Result<JobHandle> {
        let output = Command::new(&self.bsub_path)
            .args(Self::bsub_args(script, request))
            .output()
            .await
            .map_err(|e| {
                ChadoGffError::submission(
                    script.chunk_index,
                    format!("failed to run {}: {}", self.bsub_path, e),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(ChadoGffError::submission(
                script.chunk_index,
                format!(
                    "bsub exited with {}: {}",
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        let job_id = parse_job_id(&stdout).ok_or_else(|| {
            ChadoGffError::submission(
                script.chunk_index,
                format!("could not parse bsub output: {}", stdout.trim()),
            )
        })?;

        tracing::debug!(
            chunk_index = script.chunk_index,
            job_id = %job_id,
            queue = %request.queue_name,
            "bsub accepted job"
        );

        Ok(JobHandle::Queued { job_id })
    }
}
