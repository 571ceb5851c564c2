//! Status command implementation
//!
//! Reads the status markers under the workspace once and prints one line per
//! chunk. Nothing is polled.

use crate::config::load_config;
use crate::core::tracker::{scan, MarkerState};
use crate::domain::{chunk_name, parse_script_file_name, parse_status_file_name};
use clap::Args;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show chunks that have not succeeded
    #[arg(long)]
    pub failed_only: bool,
}

/// Chunk indices with a script or a status marker in the workspace
pub fn known_chunks(scripts_dir: &Path, status_dir: &Path) -> std::io::Result<Vec<usize>> {
    let mut indices = Vec::new();
    let parsers: [(&Path, fn(&str) -> Option<usize>); 2] = [
        (scripts_dir, parse_script_file_name),
        (status_dir, parse_status_file_name),
    ];
    for (dir, parse) in parsers {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            indices.extend(parse(&name));
        }
    }
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

fn describe(state: &MarkerState) -> String {
    state
        .outcome()
        .map(|o| o.to_string())
        .unwrap_or_else(|| "pending".to_string())
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking run status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let indices = match known_chunks(&config.scripts_path(), &config.status_path()) {
            Ok(i) => i,
            Err(e) => {
                println!("Failed to read workspace {}", config.target_path().display());
                println!("   Error: {e}");
                return Ok(3);
            }
        };

        println!("Run Status: {}", config.target_path().display());
        println!();

        if indices.is_empty() {
            println!("No chunks found. Run 'chado-gff export' first.");
            return Ok(0);
        }

        let states: BTreeMap<usize, MarkerState> = scan(&config.status_path(), &indices).await;
        let mut succeeded = 0;
        let mut pending = 0;
        let mut failed = 0;

        for (index, state) in &states {
            match state {
                MarkerState::Pending => pending += 1,
                MarkerState::Exited(0) => succeeded += 1,
                _ => failed += 1,
            }
            if self.failed_only && matches!(state, MarkerState::Exited(0)) {
                continue;
            }
            println!("  {}  {}", chunk_name(*index), describe(state));
        }

        println!();
        println!(
            "  {} chunks: {} succeeded, {} failed, {} pending",
            states.len(),
            succeeded,
            failed,
            pending
        );

        Ok(if failed > 0 { 1 } else { 0 })
    }
}
