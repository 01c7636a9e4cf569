use crate::corpus::{CorpusError, SeedId};
use std::path::PathBuf;
use thiserror::Error;

/// Why a single trace record was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Empty trace record")]
    Empty,

    #[error("Trace record is not valid UTF-8")]
    NotUtf8,

    #[error("Expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("Invalid value {value:?} in field {index}")]
    InvalidValue { index: usize, value: String },
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("Malformed trace for seed {seed}: {source}")]
    Malformed {
        seed: String,
        #[source]
        source: RecordError,
    },

    #[error("No trace record for seed {0}")]
    MissingTrace(String),

    #[error("Duplicate seed name: {0}")]
    DuplicateSeed(String),

    #[error("Seed {0} is not in the trace store")]
    UnknownSeed(SeedId),

    #[error("Failed to read trace {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
