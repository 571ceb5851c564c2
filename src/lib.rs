// chado-gff - Chado organism GFF export on a compute queue
// Copyright (c) 2025 chado-gff Contributors
// Licensed under the MIT License

//! # chado-gff - Chado organism GFF export
//!
//! chado-gff exports genome annotation for a set of organisms from a Chado
//! database as sorted, compressed GFF3, spreading the work over a compute
//! queue.
//!
//! ## Overview
//!
//! A run:
//! - **Reads** the organism list from a file or from the Chado `organism` table
//! - **Partitions** it into chunks of `slice_size` organisms
//! - **Generates** one bash job script per chunk that runs `writedb_entry`
//!   and `gt gff3` for every organism in it
//! - **Submits** each script to LSF (or runs it locally)
//! - **Tracks** per-chunk status markers until every chunk is done
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline (chunker, workspace, scripts, submission, tracking)
//! - [`adapters`] - Organism sources and queue backends
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chado_gff::adapters::queue::create_queue;
//! use chado_gff::adapters::source::create_source;
//! use chado_gff::config::load_config;
//! use chado_gff::core::export::ExportCoordinator;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("chado-gff.toml")?;
//!     let source = create_source(false, Path::new("chado-gff.orglist"), &config)?;
//!     let queue = create_queue(&config.queue);
//!
//!     let (_tx, rx) = tokio::sync::watch::channel(false);
//!     let summary = ExportCoordinator::new(config, source, queue, rx)
//!         .execute_export()
//!         .await?;
//!
//!     std::process::exit(summary.exit_code());
//! }
//! ```
//!
//! ## Status markers
//!
//! Every job script ends by writing `status/chunk_NNNNN.status` with its exit
//! status. The tracker treats a missing marker as still running, `0` as
//! success and anything else as failure. A chunk whose marker never appears
//! before `tracking.timeout_secs` is reported as timed out.
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], whose error type is
//! [`domain::ChadoGffError`]:
//!
//! ```rust
//! use chado_gff::core::chunker::partition;
//! use chado_gff::domain::ChadoGffError;
//!
//! let err = partition(&[], 0).unwrap_err();
//! assert!(matches!(err, ChadoGffError::Configuration(_)));
//! assert_eq!(err.exit_code(), 2);
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
