//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX.

use chado_gff::config::{load_config, QueueBackend};
use chado_gff::domain::ChadoGffError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("CHADO_GFF_APPLICATION_DRY_RUN");
    std::env::remove_var("CHADO_GFF_EXPORT_SLICE_SIZE");
    std::env::remove_var("CHADO_GFF_QUEUE_NAME");
    std::env::remove_var("CHADO_GFF_QUEUE_BACKEND");
    std::env::remove_var("CHADO_GFF_DATABASE_PASSWORD");
    std::env::remove_var("TEST_CHADO_TARGET");
    std::env::remove_var("TEST_CHADO_DB_PASSWORD");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const COMPLETE: &str = r#"
[application]
log_level = "debug"
dry_run = false

[tools]
writedb_entry = "/software/pathogen/projects/artemis/current/etc/writedb_entry"
gt = "/software/pathogen/external/apps/usr/local/genometools-1.5.9/bin/gt"

[export]
slice_size = 10
target_path = "/lustre/scratch118/infgen/pathdev/chado-gff"

[queue]
backend = "lsf"
name = "basement"
memory_mb = 4000

[tracking]
poll_interval_secs = 30
timeout_secs = 7200

[database]
host = "pathdb"
port = 10120
dbname = "pathogens"
user = "genedb_ro"
password = "secret"
public_only = true

[logging]
local_enabled = false
"#;

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(COMPLETE);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.export.slice_size, 10);
    assert_eq!(config.queue.backend, QueueBackend::Lsf);
    assert_eq!(config.queue.name, "basement");
    assert_eq!(config.queue.memory_mb, Some(4000));
    assert_eq!(config.tracking.poll_interval_secs, 30);

    let root = PathBuf::from("/lustre/scratch118/infgen/pathdev/chado-gff");
    assert_eq!(config.target_path(), root);
    assert_eq!(config.results_path(), root.join("results"));
    assert_eq!(config.scripts_path(), root.join("scripts"));
    assert_eq!(config.logs_path(), root.join("logs"));
    assert_eq!(config.status_path(), root.join("status"));

    let db = config.database.as_ref().unwrap();
    assert_eq!(db.writedb_target(), "pathdb:10120/pathogens?genedb_ro");
    assert!(db.public_only);
    let password: &str = db.password.as_ref().unwrap().expose_secret().as_ref();
    assert_eq!(password, "secret");
}

#[test]
fn test_defaults_for_optional_sections() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[tools]
writedb_entry = "/opt/writedb_entry"
gt = "/opt/gt"

[export]
target_path = "/data/chado-gff"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.export.slice_size, 10);
    assert_eq!(config.queue.backend, QueueBackend::Lsf);
    assert_eq!(config.queue.bsub_path, "bsub");
    assert_eq!(config.tracking.timeout_secs, 86400);
    assert!(!config.application.dry_run);
    assert!(config.database.is_none());
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_CHADO_TARGET", "/scratch/run42");
    std::env::set_var("TEST_CHADO_DB_PASSWORD", "from-env");

    let file = write_config(
        r#"
[tools]
writedb_entry = "/opt/writedb_entry"
gt = "/opt/gt"

[export]
target_path = "${TEST_CHADO_TARGET}"

[database]
host = "pathdb"
dbname = "pathogens"
user = "genedb_ro"
password = "${TEST_CHADO_DB_PASSWORD}"
"#,
    );
    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.export.target_path, "/scratch/run42");
    let password: &str = config
        .database
        .as_ref()
        .unwrap()
        .password
        .as_ref()
        .unwrap()
        .expose_secret()
        .as_ref();
    assert_eq!(password, "from-env");
}

#[test]
fn test_env_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("CHADO_GFF_EXPORT_SLICE_SIZE", "3");
    std::env::set_var("CHADO_GFF_QUEUE_NAME", "normal");
    std::env::set_var("CHADO_GFF_QUEUE_BACKEND", "local");
    std::env::set_var("CHADO_GFF_APPLICATION_DRY_RUN", "true");

    let file = write_config(COMPLETE);
    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.export.slice_size, 3);
    assert_eq!(config.queue.name, "normal");
    assert_eq!(config.queue.backend, QueueBackend::Local);
    assert!(config.application.dry_run);
}

#[test]
fn test_invalid_env_override_is_configuration_error() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("CHADO_GFF_EXPORT_SLICE_SIZE", "ten");

    let file = write_config(COMPLETE);
    let result = load_config(file.path());
    cleanup_env_vars();

    assert!(matches!(result, Err(ChadoGffError::Configuration(_))));
}

#[test]
fn test_missing_required_section() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[export]
target_path = "/data/chado-gff"
"#,
    );
    let err = load_config(file.path()).unwrap_err();

    assert!(matches!(err, ChadoGffError::Configuration(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_timeout_shorter_than_poll_interval_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[tools]
writedb_entry = "/opt/writedb_entry"
gt = "/opt/gt"

[export]
target_path = "/data/chado-gff"

[tracking]
poll_interval_secs = 600
timeout_secs = 60
"#,
    );

    assert!(load_config(file.path()).is_err());
}
