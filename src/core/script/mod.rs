//! Job script generation
//!
//! One bash script is rendered per chunk. For each organism it runs the
//! export tool followed by the conversion tool, counts failures instead of
//! aborting, and finally writes the chunk's status marker atomically (temp
//! file + `mv`). The marker holds the script's exit status: `0` when every
//! organism converted, `1` otherwise.

pub mod command;

use crate::config::ChadoGffConfig;
use crate::core::workspace::Workspace;
use crate::domain::{ChadoGffError, Chunk, Result};
use command::{conversion_invocation, export_invocation, raw_gff_path, shell_quote};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A generated, executable script bound to exactly one chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobScript {
    pub chunk_index: usize,
    pub path: PathBuf,
    pub organism_count: usize,
}

/// Renders and writes job scripts
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    writedb_entry: String,
    gt: String,
    database_target: Option<String>,
}

impl ScriptGenerator {
    /// Creates a generator from explicit tool paths
    pub fn new(
        writedb_entry: impl Into<String>,
        gt: impl Into<String>,
        database_target: Option<String>,
    ) -> Self {
        Self {
            writedb_entry: writedb_entry.into(),
            gt: gt.into(),
            database_target,
        }
    }

    /// Creates a generator from the `[tools]` and `[database]` sections
    pub fn from_config(config: &ChadoGffConfig) -> Self {
        Self::new(
            config.tools.writedb_entry.clone(),
            config.tools.gt.clone(),
            config.database.as_ref().map(|db| db.writedb_target()),
        )
    }

    /// Renders the script text for a chunk without touching the filesystem
    ///
    /// # Errors
    ///
    /// Returns [`ChadoGffError::Generation`] if a tool path is empty.
    pub fn render(&self, chunk: &Chunk, workspace: &Workspace) -> Result<String> {
        if self.writedb_entry.trim().is_empty() {
            return Err(ChadoGffError::generation(
                chunk.index(),
                "export tool path (tools.writedb_entry) is empty",
            ));
        }
        if self.gt.trim().is_empty() {
            return Err(ChadoGffError::generation(
                chunk.index(),
                "conversion tool path (tools.gt) is empty",
            ));
        }

        let work_dir = workspace.work_dir(chunk.index());
        let status_file = workspace.status_path(chunk.index());

        let mut script = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(script, "#!/usr/bin/env bash");
        let _ = writeln!(script, "# chado-gff job script for {chunk}");
        let _ = writeln!(script, "set -u");
        let _ = writeln!(script);
        let _ = writeln!(script, "work_dir={}", quote_path(&work_dir));
        let _ = writeln!(script, "status_file={}", quote_path(&status_file));
        let _ = writeln!(script, "failures=0");
        let _ = writeln!(script);
        let _ = writeln!(script, "finish() {{");
        let _ = writeln!(
            script,
            "    printf '%s\\n' \"$1\" > \"${{status_file}}.tmp\" && mv -f \"${{status_file}}.tmp\" \"${{status_file}}\""
        );
        let _ = writeln!(script, "    exit \"$1\"");
        let _ = writeln!(script, "}}");
        let _ = writeln!(script);
        let _ = writeln!(script, "mkdir -p \"${{work_dir}}\" || finish 1");
        let _ = writeln!(script, "cd \"${{work_dir}}\" || finish 1");

        for organism in chunk.organisms() {
            let export = export_invocation(
                &self.writedb_entry,
                organism,
                &work_dir,
                self.database_target.as_deref(),
            );
            let convert = conversion_invocation(&self.gt, organism, &work_dir, &workspace.results);
            let raw = raw_gff_path(&work_dir, organism);

            let _ = writeln!(script);
            let _ = writeln!(script, "# {organism}");
            let _ = writeln!(script, "if {export} && {convert}; then");
            let _ = writeln!(script, "    rm -f {}", quote_path(&raw));
            let _ = writeln!(script, "else");
            let _ = writeln!(
                script,
                "    echo {} >&2",
                shell_quote(&format!("chado-gff: export failed for {organism}"))
            );
            let _ = writeln!(script, "    failures=$((failures + 1))");
            let _ = writeln!(script, "fi");
        }

        let _ = writeln!(script);
        let _ = writeln!(script, "cd / && rm -rf \"${{work_dir}}\"");
        let _ = writeln!(script, "if [ \"${{failures}}\" -eq 0 ]; then");
        let _ = writeln!(script, "    finish 0");
        let _ = writeln!(script, "fi");
        let _ = writeln!(script, "finish 1");

        Ok(script)
    }

    /// Writes the executable script for `chunk` into `workspace.scripts`
    ///
    /// Any status marker left by a previous run of the same chunk index is
    /// removed first. The script is overwritten, never appended to, and is not
    /// executed.
    ///
    /// # Errors
    ///
    /// Returns [`ChadoGffError::Generation`] if a tool path is empty or the
    /// script cannot be written.
    pub fn generate(&self, chunk: &Chunk, workspace: &Workspace) -> Result<JobScript> {
        let content = self.render(chunk, workspace)?;
        let path = workspace.script_path(chunk.index());

        clear_stale_status(chunk.index(), &workspace.status_path(chunk.index()))?;

        fs::write(&path, content).map_err(|e| {
            ChadoGffError::generation(
                chunk.index(),
                format!("failed to write {}: {}", path.display(), e),
            )
        })?;
        make_executable(chunk.index(), &path)?;

        tracing::debug!(
            chunk_index = chunk.index(),
            script = %path.display(),
            organisms = chunk.len(),
            "Generated job script"
        );

        Ok(JobScript {
            chunk_index: chunk.index(),
            path,
            organism_count: chunk.len(),
        })
    }
}

fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

fn clear_stale_status(chunk_index: usize, status_file: &Path) -> Result<()> {
    let tmp = status_file.with_extension("status.tmp");
    for marker in [status_file, tmp.as_path()] {
        match fs::remove_file(marker) {
            Ok(()) => {
                tracing::debug!(chunk_index, marker = %marker.display(), "Removed stale status marker");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ChadoGffError::generation(
                    chunk_index,
                    format!("failed to remove stale marker {}: {}", marker.display(), e),
                ))
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(chunk_index: usize, path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
        ChadoGffError::generation(
            chunk_index,
            format!("failed to mark {} executable: {}", path.display(), e),
        )
    })
}

#[cfg(not(unix))]
fn make_executable(_chunk_index: usize, _path: &Path) -> Result<()> {
    Ok(())
}
