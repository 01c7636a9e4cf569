use super::OutputError;
use crate::selector::SelectionSet;
use crate::trace::TraceStore;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Copies selected seeds into the destination corpus.
///
/// Source files are only read. Existing files in the destination are never
/// overwritten, and a failed write removes whatever it had already created.
pub struct OutputWriter {
    dir: PathBuf,
}

/// Files and directories created by one write, in creation order
#[derive(Default)]
struct Created {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy every selected seed, keeping its name. Returns the written paths.
    pub fn write(&self, store: &TraceStore, selection: &SelectionSet) -> Result<Vec<PathBuf>, OutputError> {
        // 1. Resolve and check every destination before touching the disk
        let mut plan = Vec::with_capacity(selection.len());
        for id in selection.iter() {
            let seed = store.seed(id).ok_or(OutputError::UnknownSeed(id))?;
            let dest = self.dir.join(&seed.name);
            if dest.exists() {
                return Err(OutputError::Exists(dest));
            }
            plan.push((seed.path.clone(), dest));
        }

        // 2. Copy
        let mut created = Created::default();
        if let Err(source) = create_dirs(&self.dir, &mut created.dirs) {
            rollback(&created);
            return Err(OutputError::CreateDir {
                path: self.dir.clone(),
                source,
            });
        }

        for (from, to) in plan {
            if let Err(e) = copy_one(&from, &to, &mut created) {
                rollback(&created);
                return Err(e);
            }
            created.files.push(to);
        }

        info!(count = created.files.len(), dir = %self.dir.display(), "wrote reduced corpus");
        Ok(created.files)
    }
}

fn rollback(created: &Created) {
    warn!(
        files = created.files.len(),
        dirs = created.dirs.len(),
        "rolling back partial output"
    );
    for path in &created.files {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove partial output");
        }
    }
    for dir in created.dirs.iter().rev() {
        if let Err(e) = fs::remove_dir(dir) {
            warn!(dir = %dir.display(), error = %e, "failed to remove output directory");
        }
    }
}

/// Create `dir` and any missing ancestors, recording each directory made
fn create_dirs(dir: &Path, created: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut missing = Vec::new();
    let mut cur = dir;
    while !cur.as_os_str().is_empty() && !cur.exists() {
        missing.push(cur.to_path_buf());
        match cur.parent() {
            Some(parent) => cur = parent,
            None => break,
        }
    }

    for path in missing.into_iter().rev() {
        match fs::create_dir(&path) {
            Ok(()) => created.push(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn copy_one(from: &Path, to: &Path, created: &mut Created) -> Result<(), OutputError> {
    let copy_err = |source| OutputError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent() {
        create_dirs(parent, &mut created.dirs).map_err(copy_err)?;
    }
    fs::copy(from, to).map_err(copy_err)?;
    Ok(())
}
