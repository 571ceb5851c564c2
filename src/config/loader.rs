//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ChadoGffConfig, QueueBackend};
use super::secret::secret_string;
use crate::domain::errors::ChadoGffError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ChadoGffConfig
/// 4. Applies environment variable overrides (CHADO_GFF_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a [`ChadoGffError::Configuration`] if any step fails.
///
/// # Examples
///
/// ```no_run
/// use chado_gff::config::loader::load_config;
///
/// let config = load_config("chado-gff.toml").expect("Failed to load config");
/// println!("slice size: {}", config.export.slice_size);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ChadoGffConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ChadoGffError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ChadoGffError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<ChadoGffConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ChadoGffConfig = toml::from_str(&contents)
        .map_err(|e| ChadoGffError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ChadoGffError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ChadoGffError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        ChadoGffError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

/// Applies environment variable overrides using CHADO_GFF_* prefix
///
/// Environment variables follow the pattern: CHADO_GFF_<SECTION>_<KEY>
/// For example: CHADO_GFF_EXPORT_SLICE_SIZE, CHADO_GFF_QUEUE_NAME
fn apply_env_overrides(config: &mut ChadoGffConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("CHADO_GFF_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = var("CHADO_GFF_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("CHADO_GFF_APPLICATION_DRY_RUN", &val)?;
    }

    // Tool overrides
    if let Some(val) = var("CHADO_GFF_TOOLS_WRITEDB_ENTRY") {
        config.tools.writedb_entry = val;
    }
    if let Some(val) = var("CHADO_GFF_TOOLS_GT") {
        config.tools.gt = val;
    }

    // Export overrides
    if let Some(val) = var("CHADO_GFF_EXPORT_SLICE_SIZE") {
        config.export.slice_size = parse_override("CHADO_GFF_EXPORT_SLICE_SIZE", &val)?;
    }
    if let Some(val) = var("CHADO_GFF_EXPORT_TARGET_PATH") {
        config.export.target_path = val;
    }

    // Queue overrides
    if let Some(val) = var("CHADO_GFF_QUEUE_BACKEND") {
        config.queue.backend = match val.to_lowercase().as_str() {
            "lsf" => QueueBackend::Lsf,
            "local" => QueueBackend::Local,
            other => {
                return Err(ChadoGffError::Configuration(format!(
                    "Invalid value '{other}' for CHADO_GFF_QUEUE_BACKEND. Must be one of: lsf, local"
                )))
            }
        };
    }
    if let Some(val) = var("CHADO_GFF_QUEUE_NAME") {
        config.queue.name = val;
    }
    if let Some(val) = var("CHADO_GFF_QUEUE_MEMORY_MB") {
        config.queue.memory_mb = Some(parse_override("CHADO_GFF_QUEUE_MEMORY_MB", &val)?);
    }

    // Tracking overrides
    if let Some(val) = var("CHADO_GFF_TRACKING_POLL_INTERVAL_SECS") {
        config.tracking.poll_interval_secs =
            parse_override("CHADO_GFF_TRACKING_POLL_INTERVAL_SECS", &val)?;
    }
    if let Some(val) = var("CHADO_GFF_TRACKING_TIMEOUT_SECS") {
        config.tracking.timeout_secs = parse_override("CHADO_GFF_TRACKING_TIMEOUT_SECS", &val)?;
    }

    // Database overrides (only if the section is configured)
    if let Some(ref mut database) = config.database {
        if let Some(val) = var("CHADO_GFF_DATABASE_HOST") {
            database.host = val;
        }
        if let Some(val) = var("CHADO_GFF_DATABASE_PORT") {
            database.port = parse_override("CHADO_GFF_DATABASE_PORT", &val)?;
        }
        if let Some(val) = var("CHADO_GFF_DATABASE_USER") {
            database.user = val;
        }
        if let Some(val) = var("CHADO_GFF_DATABASE_PASSWORD") {
            database.password = Some(secret_string(val));
        }
    }

    // Logging overrides
    if let Some(val) = var("CHADO_GFF_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("CHADO_GFF_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("CHADO_GFF_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("CHADO_GFF_LOADER_TEST_VAR", "/opt/gt");
        let input = "gt = \"${CHADO_GFF_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "gt = \"/opt/gt\"\n");
        std::env::remove_var("CHADO_GFF_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# password = \"${CHADO_GFF_LOADER_UNSET_IN_COMMENT}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${CHADO_GFF_LOADER_UNSET_IN_COMMENT}"));
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("CHADO_GFF_LOADER_MISSING_VAR");
        let input = "password = \"${CHADO_GFF_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("CHADO_GFF_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-chado-gff.toml");
        assert!(matches!(result, Err(ChadoGffError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[tools]
writedb_entry = "/software/pathogen/projects/artemis/current/etc/writedb_entry"
gt = "/software/pathogen/external/apps/usr/local/genometools-1.5.9/bin/gt"

[export]
slice_size = 10
target_path = "/lustre/scratch118/infgen/pathdev/chado-gff"

[queue]
name = "basement"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.export.slice_size, 10);
        assert_eq!(config.queue.name, "basement");
        assert_eq!(
            config.tools.gt,
            "/software/pathogen/external/apps/usr/local/genometools-1.5.9/bin/gt"
        );
    }

    #[test]
    fn test_parse_config_rejects_invalid() {
        let toml_content = r#"
[tools]
writedb_entry = "/bin/writedb_entry"
gt = "/bin/gt"

[export]
slice_size = 0
target_path = "/tmp/chado-gff"
"#;
        let err = parse_config(toml_content).unwrap_err();
        assert!(matches!(err, ChadoGffError::Configuration(_)));
        assert!(err.to_string().contains("slice_size"));
    }
}
