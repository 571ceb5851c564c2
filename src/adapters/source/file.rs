//! Organism list files
//!
//! One identifier per line. Surrounding whitespace is trimmed; blank lines and
//! lines starting with `#` are ignored.

use super::{dedupe, OrganismSource};
use crate::domain::{ChadoGffError, OrganismId, OrganismList, Result};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileOrganismSource {
    path: PathBuf,
}

impl FileOrganismSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parses list file content
pub fn parse_list(content: &str) -> std::result::Result<OrganismList, String> {
    let mut ids = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let id = OrganismId::new(line).map_err(|e| format!("line {}: {}", number + 1, e))?;
        ids.push(id);
    }
    Ok(dedupe(ids))
}

#[async_trait]
impl OrganismSource for FileOrganismSource {
    fn describe(&self) -> String {
        format!("organism list {}", self.path.display())
    }

    async fn organisms(&self) -> Result<OrganismList> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ChadoGffError::Source(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let list = parse_list(&content)
            .map_err(|e| ChadoGffError::Source(format!("{}: {}", self.path.display(), e)))?;

        tracing::info!(
            path = %self.path.display(),
            organisms = list.len(),
            "Read organism list"
        );
        Ok(list)
    }
}
