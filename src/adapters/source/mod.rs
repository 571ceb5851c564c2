//! Organism sources
//!
//! An [`OrganismSource`] yields the ordered organism list for a run, either
//! from a list file or from the Chado `organism` table.

pub mod chado;
pub mod file;

use crate::config::ChadoGffConfig;
use crate::domain::{ChadoGffError, OrganismId, OrganismList, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

pub use chado::ChadoOrganismSource;
pub use file::FileOrganismSource;

/// Supplier of the organisms to export
#[async_trait]
pub trait OrganismSource: Send + Sync {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    /// Ordered organism list with duplicates removed
    ///
    /// # Errors
    ///
    /// Returns [`ChadoGffError::Source`] or [`ChadoGffError::Database`] when
    /// the list cannot be obtained.
    async fn organisms(&self) -> Result<OrganismList>;
}

/// Drops repeated identifiers, keeping the first occurrence
pub fn dedupe(ids: impl IntoIterator<Item = OrganismId>) -> OrganismList {
    let mut seen = HashSet::new();
    let mut list = Vec::new();
    for id in ids {
        if seen.insert(id.clone()) {
            list.push(id);
        } else {
            tracing::warn!(organism = %id, "Duplicate organism ignored");
        }
    }
    list
}

/// Selects the source for an export run
///
/// With `all` set the Chado database is enumerated, which requires a
/// `[database]` section. Otherwise organisms are read from `org_list`.
pub fn create_source(
    all: bool,
    org_list: &Path,
    config: &ChadoGffConfig,
) -> Result<Box<dyn OrganismSource>> {
    if all {
        let database = config.database.as_ref().ok_or_else(|| {
            ChadoGffError::Configuration(
                "exporting all organisms requires a [database] section".to_string(),
            )
        })?;
        Ok(Box::new(ChadoOrganismSource::new(
            database,
            config.export.slice_size,
        )?))
    } else {
        Ok(Box::new(FileOrganismSource::new(org_list)))
    }
}
