use super::TraceError;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where raw trace records are read from.
///
/// A store never keeps decoded vectors; it asks its source again whenever
/// a vector is needed.
pub trait TraceSource {
    /// Raw record of the seed called `name`, `None` when it has no trace
    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>, TraceError>;
}

/// One trace file per seed: `<dir>/<seed name><suffix>`
pub struct TraceDir {
    dir: PathBuf,
    suffix: String,
}

impl TraceDir {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", name, self.suffix))
    }
}

impl TraceSource for TraceDir {
    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>, TraceError> {
        let path = self.path_of(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TraceError::Io { path, source }),
        }
    }
}

/// A single file of keyed rows: `<seed name><delim><record>` per line.
///
/// Opening the file only indexes where each row starts; rows are read back
/// one at a time on demand. When a name appears on several rows the first
/// one wins.
pub struct TraceFile {
    path: PathBuf,
    rows: HashMap<String, (u64, usize)>,
}

impl TraceFile {
    pub fn open(path: impl Into<PathBuf>, delimiter: char) -> Result<Self, TraceError> {
        let path = path.into();
        let io_err = |source| TraceError::Io {
            path: path.clone(),
            source,
        };

        let mut reader = BufReader::new(File::open(&path).map_err(io_err)?);
        let mut sep_buf = [0u8; 4];
        let sep = delimiter.encode_utf8(&mut sep_buf).as_bytes();

        let mut rows = HashMap::new();
        let mut line = Vec::new();
        let mut offset = 0u64;
        let mut line_no = 0usize;

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line).map_err(io_err)?;
            if read == 0 {
                break;
            }
            line_no += 1;
            let start = offset;
            offset += read as u64;

            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            let Some(split) = line.windows(sep.len()).position(|w| w == sep) else {
                warn!(line = line_no, "trace row has no seed name, ignoring");
                continue;
            };
            let Ok(key) = std::str::from_utf8(&line[..split]) else {
                warn!(line = line_no, "trace row key is not valid UTF-8, ignoring");
                continue;
            };

            let key = key.trim().to_string();
            let record_start = split + sep.len();
            if rows.contains_key(&key) {
                warn!(seed = %key, line = line_no, "duplicate trace row, keeping the first");
                continue;
            }
            rows.insert(key, (start + record_start as u64, read - record_start));
        }

        debug!(path = %path.display(), rows = rows.len(), "indexed trace file");
        Ok(Self { path, rows })
    }

    /// Number of indexed rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TraceSource for TraceFile {
    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>, TraceError> {
        let Some(&(offset, len)) = self.rows.get(name) else {
            return Ok(None);
        };
        let io_err = |source| TraceError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = File::open(&self.path).map_err(io_err)?;
        file.seek(SeekFrom::Start(offset)).map_err(io_err)?;
        let mut record = vec![0u8; len];
        file.read_exact(&mut record).map_err(io_err)?;
        Ok(Some(record))
    }
}

/// Records already held in memory, keyed by seed name
impl TraceSource for HashMap<String, Vec<u8>> {
    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>, TraceError> {
        Ok(self.get(name).cloned())
    }
}
