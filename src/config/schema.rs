//! Configuration schema types
//!
//! This module defines the statically-shaped configuration for chado-gff.
//! Every setting the pipeline reads has a named field here and is checked
//! once by [`ChadoGffConfig::validate`].

use crate::config::SecretString;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Queue backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    /// IBM Spectrum LSF via `bsub`
    #[default]
    Lsf,
    /// Run each script synchronously on this host
    Local,
}

impl fmt::Display for QueueBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueBackend::Lsf => write!(f, "lsf"),
            QueueBackend::Local => write!(f, "local"),
        }
    }
}

/// Main chado-gff configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct ChadoGffConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// External tool locations
    pub tools: ToolsConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Queue settings
    #[serde(default)]
    pub queue: QueueConfig,

    /// Status polling settings
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Chado database (required when exporting all organisms)
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChadoGffConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.tools.validate()?;
        self.export.validate()?;
        self.queue.validate()?;
        self.tracking.validate()?;
        if let Some(ref database) = self.database {
            database.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }

    /// Root of the run workspace
    pub fn target_path(&self) -> PathBuf {
        PathBuf::from(&self.export.target_path)
    }

    /// `{target_path}/results`
    pub fn results_path(&self) -> PathBuf {
        self.target_path().join("results")
    }

    /// `{target_path}/scripts`
    pub fn scripts_path(&self) -> PathBuf {
        self.target_path().join("scripts")
    }

    /// `{target_path}/logs`
    pub fn logs_path(&self) -> PathBuf {
        self.target_path().join("logs")
    }

    /// `{target_path}/status`
    pub fn status_path(&self) -> PathBuf {
        self.target_path().join("status")
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (generate scripts, never submit them)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Locations of the external export and conversion binaries
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Artemis `writedb_entry` binary (Chado to GFF export)
    pub writedb_entry: String,

    /// GenomeTools `gt` binary (GFF3 tidy/sort/compress)
    pub gt: String,
}

impl ToolsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.writedb_entry.trim().is_empty() {
            return Err("tools.writedb_entry cannot be empty".to_string());
        }
        if self.gt.trim().is_empty() {
            return Err("tools.gt cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Maximum number of organisms per job script
    #[serde(default = "default_slice_size")]
    pub slice_size: usize,

    /// Root directory of the run workspace
    pub target_path: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.slice_size == 0 {
            return Err("export.slice_size must be >= 1".to_string());
        }
        if self.target_path.trim().is_empty() {
            return Err("export.target_path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Queue configuration
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// Backend used to run job scripts
    #[serde(default)]
    pub backend: QueueBackend,

    /// Queue name handed to the scheduler
    #[serde(default = "default_queue_name")]
    pub name: String,

    /// Memory reservation per job in MB (LSF `-M` / `rusage[mem=]`)
    #[serde(default)]
    pub memory_mb: Option<u64>,

    /// Path to the `bsub` binary
    #[serde(default = "default_bsub_path")]
    pub bsub_path: String,
}

impl QueueConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("queue.name cannot be empty".to_string());
        }
        if self.backend == QueueBackend::Lsf && self.bsub_path.trim().is_empty() {
            return Err("queue.bsub_path cannot be empty when backend is 'lsf'".to_string());
        }
        if self.memory_mb == Some(0) {
            return Err("queue.memory_mb must be > 0 when set".to_string());
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: QueueBackend::default(),
            name: default_queue_name(),
            memory_mb: None,
            bsub_path: default_bsub_path(),
        }
    }
}

/// Status polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Seconds between status directory scans
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seconds after which chunks without a marker are reported TimedOut
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TrackingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("tracking.poll_interval_secs must be > 0".to_string());
        }
        if self.timeout_secs < self.poll_interval_secs {
            return Err(format!(
                "tracking.timeout_secs ({}) must be >= tracking.poll_interval_secs ({})",
                self.timeout_secs, self.poll_interval_secs
            ));
        }
        Ok(())
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chado database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,

    /// Database port
    #[serde(default = "default_db_port")]
    pub port: u16,

    /// Database name
    pub dbname: String,

    /// Database user
    pub user: String,

    /// Database password (optional for trust/ident auth)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Only enumerate organisms flagged `genedb_public = yes`
    #[serde(default)]
    pub public_only: bool,

    /// Connection timeout in seconds
    #[serde(default = "default_db_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("database.host cannot be empty".to_string());
        }
        if self.dbname.trim().is_empty() {
            return Err("database.dbname cannot be empty".to_string());
        }
        if self.user.trim().is_empty() {
            return Err("database.user cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("database.port must be > 0".to_string());
        }
        Ok(())
    }

    /// Connection target in the `host:port/dbname?user` form `writedb_entry` expects
    pub fn writedb_target(&self) -> String {
        format!("{}:{}/{}?{}", self.host, self.port, self.dbname, self.user)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_slice_size() -> usize {
    10
}

fn default_queue_name() -> String {
    "normal".to_string()
}

fn default_bsub_path() -> String {
    "bsub".to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    86_400
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_connect_timeout_secs() -> u64 {
    30
}

fn default_local_path() -> String {
    "/var/log/chado-gff".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
