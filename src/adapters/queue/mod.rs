//! Compute queue backends
//!
//! A [`JobQueue`] accepts one generated script at a time and returns the
//! handle the backend assigned to it. Submission must not wait for the job
//! to finish, except for [`LocalQueue`], which exists to run a whole export on
//! a single host.

pub mod local;
pub mod lsf;

use crate::config::{QueueBackend, QueueConfig};
use crate::core::script::JobScript;
use crate::core::submit::{JobHandle, QueueRequest};
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use local::LocalQueue;
pub use lsf::LsfQueue;

/// Backend that executes job scripts
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Short backend name for logs
    fn backend(&self) -> &'static str;

    /// Hands `script` to the backend
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ChadoGffError::Submission`] when the backend
    /// rejects or cannot start the job.
    async fn submit(&self, script: &JobScript, request: &QueueRequest) -> Result<JobHandle>;
}

/// Creates the queue backend selected in configuration
pub fn create_queue(config: &QueueConfig) -> Arc<dyn JobQueue> {
    match config.backend {
        QueueBackend::Lsf => Arc::new(LsfQueue::new(config.bsub_path.clone())),
        QueueBackend::Local => Arc::new(LocalQueue::new()),
    }
}
