//! Export coordinator - main orchestrator for a run
//!
//! Drives the pipeline from organism source to tracked chunk outcomes:
//! workspace, partition, script generation, submission, tracking.

use crate::adapters::queue::JobQueue;
use crate::adapters::source::OrganismSource;
use crate::config::ChadoGffConfig;
use crate::core::chunker::partition;
use crate::core::export::summary::{RunError, RunSummary};
use crate::core::script::{JobScript, ScriptGenerator};
use crate::core::submit::{JobHandle, JobSubmitter};
use crate::core::tracker::{ChunkOutcome, StatusTracker};
use crate::core::workspace::Workspace;
use crate::domain::{Chunk, Result};
use crate::{log_chunk_outcome, log_chunk_submitted, log_error_with_context};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator {
    config: ChadoGffConfig,
    source: Box<dyn OrganismSource>,
    queue: Arc<dyn JobQueue>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// `config` must already be validated.
    pub fn new(
        config: ChadoGffConfig,
        source: Box<dyn OrganismSource>,
        queue: Arc<dyn JobQueue>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            source,
            queue,
            shutdown_rx,
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Execute the export
    ///
    /// 1. Prepares the workspace
    /// 2. Reads the organism list
    /// 3. Partitions it into chunks, dropping scripts and markers an earlier
    ///    run left beyond the new chunk count
    /// 4. Generates every script (any failure aborts before submission)
    /// 5. Submits scripts in chunk order
    /// 6. Tracks status markers until every chunk is terminal
    ///
    /// Per-chunk submission failures are recorded in the summary rather than
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns run-level errors: workspace, source, configuration or
    /// generation.
    pub async fn execute_export(&self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let dry_run = self.config.application.dry_run;
        let mut summary = RunSummary::new(dry_run);

        tracing::info!(
            run_id = %summary.run_id,
            source = %self.source.describe(),
            queue_backend = self.queue.backend(),
            dry_run,
            "Starting export run"
        );

        let workspace = Workspace::ensure(self.config.target_path())?;

        let organisms = self.source.organisms().await?;
        summary.total_organisms = organisms.len();

        let chunks = partition(&organisms, self.config.export.slice_size)?;
        workspace.prune_stale_chunks(chunks.len())?;
        if chunks.is_empty() {
            tracing::warn!("No organisms to export");
            return Ok(self.finish(summary, &workspace, start_time));
        }

        let scripts = self.generate_scripts(&chunks, &workspace)?;
        tracing::info!(chunks = scripts.len(), "Generated job scripts");

        let submitter = JobSubmitter::new(
            self.queue.clone(),
            self.config.queue.name.clone(),
            self.config.queue.memory_mb,
            !dry_run,
        );

        let mut handles: Vec<(usize, JobHandle)> = Vec::with_capacity(scripts.len());
        let mut resolved: BTreeMap<usize, ChunkOutcome> = BTreeMap::new();

        for script in &scripts {
            if self.shutdown_requested() {
                tracing::warn!(
                    chunk_index = script.chunk_index,
                    "Shutdown requested, not submitting remaining chunks"
                );
                summary.interrupted = true;
                break;
            }

            match submitter.submit(script, &workspace).await {
                Ok(handle) => {
                    log_chunk_submitted!(script.chunk_index, handle);
                    handles.push((script.chunk_index, handle));
                }
                Err(e) => {
                    tracing::error!(
                        chunk_index = script.chunk_index,
                        error = %e,
                        "Chunk submission failed"
                    );
                    summary.add_error(RunError::from(&e));
                    resolved.insert(script.chunk_index, ChunkOutcome::failure(e.to_string()));
                }
            }
        }

        if dry_run {
            for (index, _) in &handles {
                resolved.insert(*index, ChunkOutcome::NotSubmitted);
            }
        } else if !handles.is_empty() {
            let tracker = StatusTracker::new(
                workspace.status.clone(),
                Duration::from_secs(self.config.tracking.poll_interval_secs),
                Duration::from_secs(self.config.tracking.timeout_secs),
            );
            let report = tracker
                .await_completion(&handles, self.shutdown_rx.clone())
                .await;
            summary.interrupted |= report.interrupted;
            resolved.extend(report.outcomes);
        }

        let handles: BTreeMap<usize, JobHandle> = handles.into_iter().collect();
        for chunk in &chunks {
            // Chunks skipped by shutdown never reached the queue
            let outcome = resolved
                .remove(&chunk.index())
                .unwrap_or(ChunkOutcome::NotSubmitted);
            log_chunk_outcome!(chunk.index(), outcome);
            summary.record_chunk(
                chunk.index(),
                chunk.organisms().to_vec(),
                handles.get(&chunk.index()).cloned(),
                outcome,
            );
        }

        Ok(self.finish(summary, &workspace, start_time))
    }

    fn generate_scripts(&self, chunks: &[Chunk], workspace: &Workspace) -> Result<Vec<JobScript>> {
        let generator = ScriptGenerator::from_config(&self.config);
        chunks
            .iter()
            .map(|chunk| generator.generate(chunk, workspace))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                log_error_with_context!(e, "Script generation failed, aborting run");
                e
            })
    }

    fn finish(&self, summary: RunSummary, workspace: &Workspace, start_time: Instant) -> RunSummary {
        let mut summary = summary.with_duration(start_time.elapsed());
        let path = workspace.summary_path();
        if let Err(e) = summary.write_json(&path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write run summary");
            summary.add_error(RunError::from(&e));
        }
        summary.log_summary();
        summary
    }
}

impl std::fmt::Debug for ExportCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportCoordinator")
            .field("source", &self.source.describe())
            .field("queue", &self.queue.backend())
            .finish()
    }
}
