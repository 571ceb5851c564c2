//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the chado-gff configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  writedb_entry: {}", config.tools.writedb_entry);
        println!("  gt: {}", config.tools.gt);
        println!("  Slice Size: {}", config.export.slice_size);
        println!("  Target Path: {}", config.target_path().display());
        println!("  Queue Backend: {}", config.queue.backend);
        println!("  Queue Name: {}", config.queue.name);
        if let Some(memory_mb) = config.queue.memory_mb {
            println!("  Queue Memory: {memory_mb} MB");
        }
        println!(
            "  Polling: every {}s, timeout {}s",
            config.tracking.poll_interval_secs, config.tracking.timeout_secs
        );
        match &config.database {
            // Password is never printed
            Some(db) => {
                println!("  Chado Database: {}", db.writedb_target());
                println!("  Public Organisms Only: {}", db.public_only);
            }
            None => println!("  Chado Database: not configured (--all unavailable)"),
        }
        println!();
        Ok(0)
    }
}
