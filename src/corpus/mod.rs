//! Seed discovery.
//!
//! A corpus is a directory tree of seed files. Each regular, non-hidden file
//! becomes a [`Seed`] named by its path relative to the corpus root.

mod error;
mod scan;

#[cfg(test)]
mod tests;

pub use error::CorpusError;
pub use scan::{collect_seeds, SeedScan};

use std::path::PathBuf;

/// Dense index of a seed inside a [`crate::TraceStore`]
pub type SeedId = u32;

/// One fuzzing input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// `/`-separated path relative to the corpus root
    pub name: String,
    /// Location of the file on disk
    pub path: PathBuf,
    /// File size in bytes at discovery time
    pub size: u64,
}

impl Seed {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
        }
    }
}
