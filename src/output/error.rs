use crate::corpus::SeedId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Seed {0} is not in the trace store")]
    UnknownSeed(SeedId),

    #[error("Refusing to overwrite existing file {}", .0.display())]
    Exists(PathBuf),

    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
