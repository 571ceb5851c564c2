//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for chado-gff using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Default configuration file
pub const DEFAULT_CONFIG_FILE: &str = "chado-gff.toml";

/// chado-gff - Chado organism GFF export on a compute queue
#[derive(Parser, Debug)]
#[command(name = "chado-gff")]
#[command(version, about, long_about = None)]
#[command(author = "chado-gff Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short = 'i',
        long = "config",
        default_value = DEFAULT_CONFIG_FILE,
        env = "CHADO_GFF_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CHADO_GFF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate, submit and track export jobs
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show per-chunk status of the last run
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
