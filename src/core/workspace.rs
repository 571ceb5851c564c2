//! Run workspace layout
//!
//! A run writes into four directories under a single root:
//!
//! ```text
//! {root}/scripts   generated job scripts, one per chunk
//! {root}/logs      scheduler stdout/stderr and the run summary
//! {root}/results   converted GFF3 output
//! {root}/status    per-chunk exit status markers written by the jobs
//! ```
//!
//! The directories persist after the run for inspection.

use crate::domain::{
    chunk_name, parse_script_file_name, parse_status_file_name, script_file_name,
    status_file_name, ChadoGffError, Result,
};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const PROBE_FILE: &str = ".chado-gff-write-probe";

/// Resolved workspace directories for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workspace {
    pub root: PathBuf,
    pub scripts: PathBuf,
    pub logs: PathBuf,
    pub results: PathBuf,
    pub status: PathBuf,
}

impl Workspace {
    /// Describes the layout under `root` without touching the filesystem
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            scripts: root.join("scripts"),
            logs: root.join("logs"),
            results: root.join("results"),
            status: root.join("status"),
            root,
        }
    }

    /// Creates the workspace under `root`, reusing directories that already exist
    ///
    /// Calling this twice on the same root is a no-op the second time.
    ///
    /// # Errors
    ///
    /// Returns [`ChadoGffError::Workspace`] if the root cannot be created or
    /// written to, or if a subdirectory path is occupied by a non-directory.
    pub fn ensure(root: impl Into<PathBuf>) -> Result<Self> {
        let workspace = Self::at(root);

        ensure_dir(&workspace.root)?;
        for dir in workspace.subdirectories() {
            ensure_dir(dir)?;
        }
        probe_writable(&workspace.root)?;

        tracing::info!(root = %workspace.root.display(), "Workspace ready");
        Ok(workspace)
    }

    /// The four run subdirectories in a fixed order
    pub fn subdirectories(&self) -> [&Path; 4] {
        [
            self.results.as_path(),
            self.scripts.as_path(),
            self.logs.as_path(),
            self.status.as_path(),
        ]
    }

    /// `scripts/chunk_NNNNN.sh`
    pub fn script_path(&self, chunk_index: usize) -> PathBuf {
        self.scripts.join(script_file_name(chunk_index))
    }

    /// `status/chunk_NNNNN.status`
    pub fn status_path(&self, chunk_index: usize) -> PathBuf {
        self.status.join(status_file_name(chunk_index))
    }

    /// `logs/chunk_NNNNN.out`
    pub fn stdout_log_path(&self, chunk_index: usize) -> PathBuf {
        self.logs.join(format!("{}.out", chunk_name(chunk_index)))
    }

    /// `logs/chunk_NNNNN.err`
    pub fn stderr_log_path(&self, chunk_index: usize) -> PathBuf {
        self.logs.join(format!("{}.err", chunk_name(chunk_index)))
    }

    /// Scratch directory a job exports raw GFF into before conversion
    pub fn work_dir(&self, chunk_index: usize) -> PathBuf {
        self.results.join(".work").join(chunk_name(chunk_index))
    }

    /// `logs/run_summary.json`
    pub fn summary_path(&self) -> PathBuf {
        self.logs.join("run_summary.json")
    }

    /// Removes scripts and status markers left by an earlier run for chunk
    /// indices at or beyond `chunk_count`
    ///
    /// Returns the number of files removed.
    ///
    /// # Errors
    ///
    /// Returns [`ChadoGffError::Workspace`] if a directory cannot be listed or
    /// a stale file cannot be removed.
    pub fn prune_stale_chunks(&self, chunk_count: usize) -> Result<usize> {
        let script_index = |name: &str| parse_script_file_name(name);
        let status_index = |name: &str| {
            parse_status_file_name(name.strip_suffix(".tmp").unwrap_or(name))
        };

        let removed = prune_dir(&self.scripts, chunk_count, script_index)?
            + prune_dir(&self.status, chunk_count, status_index)?;
        if removed > 0 {
            tracing::info!(removed, chunk_count, "Removed files left by an earlier run");
        }
        Ok(removed)
    }
}

fn prune_dir(dir: &Path, chunk_count: usize, index_of: impl Fn(&str) -> Option<usize>) -> Result<usize> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ChadoGffError::Workspace(format!("Cannot list {}: {}", dir.display(), e))
    })?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| {
            ChadoGffError::Workspace(format!("Cannot list {}: {}", dir.display(), e))
        })?;
        let name = entry.file_name();
        let Some(index) = index_of(&*name.to_string_lossy()) else {
            continue;
        };
        if index < chunk_count {
            continue;
        }
        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(chunk_index = index, file = %path.display(), "Removed stale chunk file");
                removed += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ChadoGffError::Workspace(format!(
                    "Failed to remove stale {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }
    Ok(removed)
}

fn ensure_dir(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ChadoGffError::Workspace(format!(
            "{} exists and is not a directory",
            path.display()
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => fs::create_dir_all(path).map_err(|e| {
            ChadoGffError::Workspace(format!("Failed to create {}: {}", path.display(), e))
        }),
        Err(e) => Err(ChadoGffError::Workspace(format!(
            "Cannot access {}: {}",
            path.display(),
            e
        ))),
    }
}

fn probe_writable(root: &Path) -> Result<()> {
    let probe = root.join(PROBE_FILE);
    fs::write(&probe, b"").map_err(|e| {
        ChadoGffError::Workspace(format!("{} is not writable: {}", root.display(), e))
    })?;
    // Leftover probes are harmless
    let _ = fs::remove_file(&probe);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_creates_layout() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("chado-gff");

        let workspace = Workspace::ensure(&root).unwrap();

        for dir in ["results", "scripts", "logs", "status"] {
            assert!(root.join(dir).is_dir(), "{dir} missing");
        }
        assert_eq!(workspace.root, root);
        assert!(!root.join(PROBE_FILE).exists());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let temp = TempDir::new().unwrap();

        let first = Workspace::ensure(temp.path()).unwrap();
        let second = Workspace::ensure(temp.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 4);
    }

    #[test]
    fn test_ensure_rejects_file_collision() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("status"), "not a directory").unwrap();

        let err = Workspace::ensure(temp.path()).unwrap_err();
        assert!(matches!(err, ChadoGffError::Workspace(_)));
        assert!(err.to_string().contains("status"));
    }

    #[test]
    fn test_ensure_rejects_root_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root-is-a-file");
        fs::write(&root, "").unwrap();

        assert!(matches!(
            Workspace::ensure(&root),
            Err(ChadoGffError::Workspace(_))
        ));
    }

    #[test]
    fn test_prune_stale_chunks_keeps_current_partition() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::ensure(temp.path()).unwrap();
        for index in 0..5 {
            fs::write(workspace.script_path(index), "#!/bin/bash\n").unwrap();
            fs::write(workspace.status_path(index), "0\n").unwrap();
        }
        fs::write(workspace.status.join("chunk_00006.status.tmp"), "").unwrap();
        fs::write(workspace.scripts.join("notes.txt"), "keep").unwrap();

        let removed = workspace.prune_stale_chunks(3).unwrap();

        assert_eq!(removed, 5);
        for index in 0..3 {
            assert!(workspace.script_path(index).exists());
            assert!(workspace.status_path(index).exists());
        }
        for index in 3..5 {
            assert!(!workspace.script_path(index).exists());
            assert!(!workspace.status_path(index).exists());
        }
        assert!(!workspace.status.join("chunk_00006.status.tmp").exists());
        assert!(workspace.scripts.join("notes.txt").exists());
    }

    #[test]
    fn test_prune_stale_chunks_zero_clears_all() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::ensure(temp.path()).unwrap();
        fs::write(workspace.script_path(0), "").unwrap();
        fs::write(workspace.status_path(0), "1").unwrap();

        assert_eq!(workspace.prune_stale_chunks(0).unwrap(), 2);
        assert_eq!(workspace.prune_stale_chunks(0).unwrap(), 0);
    }

    #[test]
    fn test_chunk_paths() {
        let workspace = Workspace::at("/data/run");

        assert_eq!(
            workspace.script_path(2),
            PathBuf::from("/data/run/scripts/chunk_00002.sh")
        );
        assert_eq!(
            workspace.status_path(2),
            PathBuf::from("/data/run/status/chunk_00002.status")
        );
        assert_eq!(
            workspace.stdout_log_path(2),
            PathBuf::from("/data/run/logs/chunk_00002.out")
        );
        assert_eq!(
            workspace.stderr_log_path(2),
            PathBuf::from("/data/run/logs/chunk_00002.err")
        );
        assert_eq!(
            workspace.work_dir(2),
            PathBuf::from("/data/run/results/.work/chunk_00002")
        );
    }
}
