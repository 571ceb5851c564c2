//! Export command implementation
//!
//! Generates one job script per chunk of organisms, submits the scripts to
//! the configured queue and waits for their status markers.

use crate::adapters::queue::create_queue;
use crate::adapters::source::create_source;
use crate::config::{load_config, ChadoGffConfig};
use crate::core::export::ExportCoordinator;
use crate::log_error_with_context;
use clap::Args;
use std::path::Path;
use tokio::sync::watch;

/// Default organism list file
pub const DEFAULT_ORG_LIST: &str = "chado-gff.orglist";

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export every organism in the Chado database (takes precedence over --org-list)
    #[arg(short, long)]
    pub all: bool,

    /// File listing organisms to export, one per line
    #[arg(short = 'f', long, default_value = DEFAULT_ORG_LIST)]
    pub org_list: String,

    /// Dry run mode - generate scripts without submitting them
    #[arg(long)]
    pub dry_run: bool,

    /// Override export.slice_size
    #[arg(long)]
    pub slice_size: Option<usize>,

    /// Override queue.name
    #[arg(long)]
    pub queue: Option<String>,
}

impl ExportArgs {
    /// Applies command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut ChadoGffConfig) {
        if let Some(slice_size) = self.slice_size {
            tracing::info!(slice_size, "Overriding slice size from CLI");
            config.export.slice_size = slice_size;
        }
        if let Some(queue) = &self.queue {
            tracing::info!(queue = %queue, "Overriding queue name from CLI");
            config.queue.name = queue.clone();
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            log_error_with_context!(e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let source = match create_source(self.all, Path::new(&self.org_list), &config) {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(e, "Failed to set up organism source");
                eprintln!("Failed to set up organism source: {e}");
                return Ok(e.exit_code());
            }
        };
        let queue = create_queue(&config.queue);

        if config.application.dry_run {
            println!("DRY RUN MODE - scripts will be generated but not submitted");
            println!();
        }

        let target = config.target_path();
        let coordinator = ExportCoordinator::new(config, source, queue, shutdown_signal);

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(e.exit_code());
            }
        };

        println!();
        println!("Export Summary:");
        println!("  Run ID: {}", summary.run_id);
        println!("  Workspace: {}", target.display());
        println!("  Organisms: {}", summary.total_organisms);
        println!("  Chunks: {}", summary.chunks.len());
        if summary.dry_run {
            println!("  Scripts generated: {}", summary.chunks.len());
        } else {
            println!("  Succeeded: {}", summary.succeeded());
            println!("  Failed: {}", summary.failed());
            println!("  Timed out: {}", summary.timed_out());
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        let unsuccessful = summary.unsuccessful_chunks();
        if !unsuccessful.is_empty() {
            println!("Chunks needing attention:");
            for index in unsuccessful {
                let report = &summary.chunks[&index];
                println!(
                    "  - chunk {} ({} organisms): {}",
                    index,
                    report.organisms.len(),
                    report.outcome
                );
            }
            println!();
        }

        let exit_code = summary.exit_code();
        match exit_code {
            0 => println!("Export completed successfully"),
            130 => {
                println!("Export interrupted. Submitted jobs keep running on the queue.");
                tracing::info!("Export interrupted by user signal");
            }
            _ => println!("Export completed with failures"),
        }

        Ok(exit_code)
    }
}
