//! Chunk domain model
//!
//! A chunk is a bounded, ordered, non-empty batch of organisms processed by a
//! single job script. Every file a chunk owns in the workspace is named after
//! [`Chunk::name`], so sorting file names reproduces chunk order.

use super::ids::OrganismId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the zero-padded chunk index in file names
const CHUNK_NAME_WIDTH: usize = 5;

/// Largest chunk count whose names still sort in index order
pub const MAX_CHUNKS: usize = 10usize.pow(CHUNK_NAME_WIDTH as u32);

/// Derives the workspace file stem for a chunk index (e.g. `chunk_00003`)
pub fn chunk_name(index: usize) -> String {
    format!("chunk_{index:0width$}", width = CHUNK_NAME_WIDTH)
}

/// `chunk_NNNNN.sh`
pub fn script_file_name(index: usize) -> String {
    format!("{}.sh", chunk_name(index))
}

/// `chunk_NNNNN.status`
pub fn status_file_name(index: usize) -> String {
    format!("{}.status", chunk_name(index))
}

fn parse_file_name(file_name: &str, extension: &str) -> Option<usize> {
    file_name
        .strip_prefix("chunk_")?
        .strip_suffix(extension)?
        .parse()
        .ok()
}

/// Recovers the chunk index from a script file name
pub fn parse_script_file_name(file_name: &str) -> Option<usize> {
    parse_file_name(file_name, ".sh")
}

/// Recovers the chunk index from a status marker file name
pub fn parse_status_file_name(file_name: &str) -> Option<usize> {
    parse_file_name(file_name, ".status")
}

/// Ordered, non-empty batch of organisms with a stable 0-based index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    index: usize,
    organisms: Vec<OrganismId>,
}

impl Chunk {
    /// Creates a chunk
    ///
    /// # Errors
    ///
    /// Returns `Err` if `organisms` is empty.
    pub fn new(index: usize, organisms: Vec<OrganismId>) -> Result<Self, String> {
        if organisms.is_empty() {
            return Err(format!("Chunk {index} cannot be empty"));
        }
        Ok(Self { index, organisms })
    }

    /// Position of this chunk in the partition
    pub fn index(&self) -> usize {
        self.index
    }

    /// Organisms in this chunk, in source order
    pub fn organisms(&self) -> &[OrganismId] {
        &self.organisms
    }

    /// Number of organisms in this chunk (never zero)
    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    /// Always false; kept alongside `len` for API symmetry
    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    /// File stem shared by this chunk's script, status marker and logs
    pub fn name(&self) -> String {
        chunk_name(self.index)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} organisms)", self.name(), self.organisms.len())
    }
}
