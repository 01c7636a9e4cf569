use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to walk corpus directory: {0}")]
    Walk(#[from] walkdir::Error),
}
