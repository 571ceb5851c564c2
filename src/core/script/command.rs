//! Typed construction of external tool invocations
//!
//! Job scripts never splice raw strings into shell lines: every program and
//! argument goes through [`ToolInvocation`], which quotes each token when it
//! is rendered.

use crate::domain::OrganismId;
use std::fmt;
use std::path::{Path, PathBuf};

/// A program plus its argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        let rendered = path.to_string_lossy().into_owned();
        self.arg(rendered)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Renders the invocation as a single shell-safe command line
    pub fn to_shell(&self) -> String {
        let mut line = shell_quote(&self.program.to_string_lossy());
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell_quote(arg));
        }
        line
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell())
    }
}

/// Single-quotes a token for POSIX shells
///
/// Embedded single quotes are closed, escaped and reopened (`'\''`).
pub fn shell_quote(token: &str) -> String {
    let mut quoted = String::with_capacity(token.len() + 2);
    quoted.push('\'');
    for c in token.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Raw GFF written by the export tool for an organism
pub fn raw_gff_path(work_dir: &Path, organism: &OrganismId) -> PathBuf {
    work_dir.join(format!("{organism}.gff"))
}

/// Final compressed GFF3 for an organism
pub fn result_gff_path(results_dir: &Path, organism: &OrganismId) -> PathBuf {
    results_dir.join(format!("{organism}.gff3.gz"))
}

/// `writedb_entry -o GFF -a y -s <organism> -l <work_dir> [-u <target>]`
pub fn export_invocation(
    writedb_entry: &str,
    organism: &OrganismId,
    work_dir: &Path,
    database_target: Option<&str>,
) -> ToolInvocation {
    let mut invocation = ToolInvocation::new(writedb_entry)
        .arg("-o")
        .arg("GFF")
        .arg("-a")
        .arg("y")
        .arg("-s")
        .arg(organism.as_str())
        .arg("-l")
        .path_arg(work_dir);
    if let Some(target) = database_target {
        invocation = invocation.arg("-u").arg(target);
    }
    invocation
}

/// `gt gff3 -sort -tidy -retainids -gzip -force -o <result> <raw>`
pub fn conversion_invocation(
    gt: &str,
    organism: &OrganismId,
    work_dir: &Path,
    results_dir: &Path,
) -> ToolInvocation {
    ToolInvocation::new(gt)
        .arg("gff3")
        .arg("-sort")
        .arg("-tidy")
        .arg("-retainids")
        .arg("-gzip")
        .arg("-force")
        .arg("-o")
        .path_arg(&result_gff_path(results_dir, organism))
        .path_arg(&raw_gff_path(work_dir, organism))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("with space"), "'with space'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
        assert_eq!(shell_quote("$(rm -rf /)"), "'$(rm -rf /)'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_tool_invocation_rendering() {
        let invocation = ToolInvocation::new("/usr/bin/gt")
            .arg("gff3")
            .path_arg(Path::new("/tmp/a b.gff"));

        assert_eq!(invocation.program(), Path::new("/usr/bin/gt"));
        assert_eq!(invocation.args(), &["gff3", "/tmp/a b.gff"]);
        assert_eq!(invocation.to_shell(), "'/usr/bin/gt' 'gff3' '/tmp/a b.gff'");
    }

    #[test]
    fn test_export_invocation() {
        let organism = OrganismId::new("Pfalciparum").unwrap();
        let invocation = export_invocation(
            "/opt/artemis/writedb_entry",
            &organism,
            Path::new("/run/results/.work/chunk_00000"),
            None,
        );

        assert_eq!(
            invocation.args(),
            &[
                "-o",
                "GFF",
                "-a",
                "y",
                "-s",
                "Pfalciparum",
                "-l",
                "/run/results/.work/chunk_00000"
            ]
        );

        let with_db = export_invocation(
            "/opt/artemis/writedb_entry",
            &organism,
            Path::new("/w"),
            Some("db:5432/pathogens?ro"),
        );
        assert_eq!(
            &with_db.args()[with_db.args().len() - 2..],
            &["-u", "db:5432/pathogens?ro"]
        );
    }

    #[test]
    fn test_conversion_invocation() {
        let organism = OrganismId::new("Tbruceibrucei927").unwrap();
        let invocation = conversion_invocation(
            "/opt/gt",
            &organism,
            Path::new("/w"),
            Path::new("/run/results"),
        );

        let args = invocation.args();
        assert_eq!(args[0], "gff3");
        assert_eq!(args[args.len() - 2], "/run/results/Tbruceibrucei927.gff3.gz");
        assert_eq!(args[args.len() - 1], "/w/Tbruceibrucei927.gff");
    }
}
