use super::{CorpusError, Seed};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Result of walking a corpus directory
#[derive(Debug, Default)]
pub struct SeedScan {
    /// Seeds sorted by name
    pub seeds: Vec<Seed>,
    /// Files whose relative path is not valid UTF-8
    pub unnamed: Vec<PathBuf>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// `/`-joined components of a path relative to the corpus root
fn seed_name(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Walk `root` and collect every regular, non-hidden file as a seed.
///
/// Symlinks are not followed. Seeds come back sorted by name so that seed
/// ids are stable across runs over the same corpus. A file that cannot be
/// named is reported in [`SeedScan::unnamed`] instead of failing the walk.
pub fn collect_seeds(root: &Path) -> Result<SeedScan, CorpusError> {
    if !root.is_dir() {
        return Err(CorpusError::MissingDirectory(root.to_path_buf()));
    }

    let mut scan = SeedScan::default();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let Some(name) = seed_name(relative) else {
            warn!(path = %entry.path().display(), "seed name is not valid UTF-8, skipping");
            scan.unnamed.push(entry.path().to_path_buf());
            continue;
        };
        let size = entry.metadata()?.len();

        scan.seeds.push(Seed::new(name, entry.path(), size));
    }

    scan.seeds.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(
        root = %root.display(),
        count = scan.seeds.len(),
        unnamed = scan.unnamed.len(),
        "collected seeds"
    );

    Ok(scan)
}
