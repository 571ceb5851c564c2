//! External system integrations for chado-gff.
//!
//! - [`source`] - Where the organism list comes from (list file or Chado)
//! - [`queue`] - Where job scripts run (LSF or this host)
//!
//! Both are trait seams so the pipeline can be exercised with in-memory
//! implementations in tests.

pub mod queue;
pub mod source;
