//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Sample configuration written by `chado-gff init`
pub const SAMPLE_CONFIG: &str = r#"# chado-gff configuration
#
# Values may reference environment variables as ${VAR}. Any key can also be
# overridden with CHADO_GFF_<SECTION>_<KEY>, e.g. CHADO_GFF_QUEUE_NAME.

[application]
log_level = "info"
# Generate scripts without submitting them
dry_run = false

[tools]
# Exports one organism from Chado as GFF
writedb_entry = "/software/pathogen/projects/artemis/etc/writedb_entry"
# genometools binary used to sort, tidy and compress the GFF
gt = "/software/pathogen/external/apps/usr/bin/gt"

[export]
# Organisms per job script
slice_size = 10
# Workspace root; results, scripts, logs and status live underneath
target_path = "/lustre/scratch/chado-gff"

[queue]
# lsf or local
backend = "lsf"
name = "basement"
# memory_mb = 4000
bsub_path = "bsub"

[tracking]
poll_interval_secs = 60
timeout_secs = 86400

# Required for `chado-gff export --all`
# [database]
# host = "pathdb"
# port = 5432
# dbname = "pathogens"
# user = "genedb_ro"
# password = "${CHADO_GFF_DB_PASSWORD}"
# public_only = true

[logging]
local_enabled = false
local_path = "/var/log/chado-gff"
local_rotation = "daily"
"#;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, SAMPLE_CONFIG) {
            Ok(()) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your tool paths and queue", self.output);
                println!("  2. Validate configuration: chado-gff -i {} validate-config", self.output);
                println!("  3. Try a dry run: chado-gff -i {} export --dry-run", self.output);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}
