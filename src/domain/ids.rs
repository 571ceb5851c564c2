//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organism identifier newtype wrapper
///
/// Opaque to the exporter: the only rules enforced are the ones that keep the
/// identifier safe to use as a single command-line token and file name stem.
///
/// # Examples
///
/// ```
/// use chado_gff::domain::ids::OrganismId;
/// use std::str::FromStr;
///
/// let organism = OrganismId::from_str("Pfalciparum").unwrap();
/// assert_eq!(organism.as_str(), "Pfalciparum");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganismId(String);

impl OrganismId {
    /// Creates a new OrganismId from a string
    ///
    /// # Errors
    ///
    /// Returns `Err` if the identifier is empty, contains whitespace or a path
    /// separator.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Organism ID cannot be empty".to_string());
        }
        if id.chars().any(char::is_whitespace) {
            return Err(format!("Organism ID cannot contain whitespace: '{id}'"));
        }
        if id.contains('/') {
            return Err(format!("Organism ID cannot contain '/': '{id}'"));
        }
        Ok(Self(id))
    }

    /// Returns the organism ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganismId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OrganismId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered organism list, order-preserving from its source
pub type OrganismList = Vec<OrganismId>;

/// Parses a slice of identifiers into an [`OrganismList`]
///
/// # Errors
///
/// Returns the first identifier that fails validation.
pub fn organism_list<S: AsRef<str>>(ids: &[S]) -> Result<OrganismList, String> {
    ids.iter().map(|s| OrganismId::new(s.as_ref())).collect()
}
