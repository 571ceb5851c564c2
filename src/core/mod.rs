//! Core pipeline for chado-gff.
//!
//! # Modules
//!
//! - [`chunker`] - Partitioning of the organism list
//! - [`workspace`] - Run directory layout
//! - [`script`] - Job script generation
//! - [`submit`] - Submission of scripts to a queue
//! - [`tracker`] - Status marker polling
//! - [`export`] - Run orchestration and summary
//!
//! # Export Workflow
//!
//! 1. **Workspace**: create `results`, `scripts`, `logs` and `status`
//! 2. **Source**: read the organism list
//! 3. **Partition**: split it into chunks of `slice_size`
//! 4. **Generate**: write one job script per chunk
//! 5. **Submit**: hand scripts to the queue in chunk order
//! 6. **Track**: poll status markers until every chunk is terminal
//! 7. **Report**: write `logs/run_summary.json`
//!
//! # Example
//!
//! ```rust,no_run
//! use chado_gff::adapters::queue::create_queue;
//! use chado_gff::adapters::source::FileOrganismSource;
//! use chado_gff::config::load_config;
//! use chado_gff::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("chado-gff.toml")?;
//! let queue = create_queue(&config.queue);
//! let source = Box::new(FileOrganismSource::new("chado-gff.orglist"));
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::new(config, source, queue, shutdown_rx);
//!
//! let summary = coordinator.execute_export().await?;
//! println!("Chunks: {}", summary.chunks.len());
//! println!("Succeeded: {}", summary.succeeded());
//! # Ok(())
//! # }
//! ```

pub mod chunker;
pub mod export;
pub mod script;
pub mod submit;
pub mod tracker;
pub mod workspace;
