use super::{parse_record_bytes, CoverageVector, RecordError, TraceError, TraceSource};
use crate::corpus::{Seed, SeedId, SeedScan};
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use tracing::{debug, info, warn};

/// Default number of feature slots in a trace record
pub const DEFAULT_FEATURE_WIDTH: usize = 65536;

/// Why a seed never made it into the store
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InvalidName,
    MissingTrace,
    Malformed(RecordError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidName => write!(f, "seed name is not valid UTF-8"),
            SkipReason::MissingTrace => write!(f, "no trace record"),
            SkipReason::Malformed(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSeed {
    pub name: String,
    pub reason: SkipReason,
}

/// Immutable set of seeds whose trace records were valid at ingestion.
///
/// Only seed metadata is kept. Coverage vectors are decoded from the
/// [`TraceSource`] whenever they are asked for and belong to the caller.
pub struct TraceStore {
    width: usize,
    delimiter: char,
    seeds: Vec<Seed>,
    skipped: Vec<SkippedSeed>,
    source: Box<dyn TraceSource>,
}

/// Mutable builder for constructing a trace store
pub struct TraceStoreBuilder {
    width: usize,
    delimiter: char,
    source: Box<dyn TraceSource>,
    seeds: Vec<Seed>,
    skipped: Vec<SkippedSeed>,
    names: HashSet<String>,
}

impl TraceStoreBuilder {
    /// Create a builder expecting `width` feature slots per record
    pub fn new(width: usize, source: impl TraceSource + 'static) -> Self {
        Self {
            width,
            delimiter: ',',
            source: Box::new(source),
            seeds: Vec::new(),
            skipped: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Set the field delimiter of trace records
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Check the trace record of `seed` and add the seed.
    ///
    /// The decoded vector is dropped straight away. A missing or malformed
    /// record is remembered as skipped and reported as
    /// [`TraceError::MissingTrace`] or [`TraceError::Malformed`]; the builder
    /// stays usable.
    pub fn add_seed(&mut self, seed: Seed) -> Result<SeedId, TraceError> {
        if self.names.contains(&seed.name) {
            return Err(TraceError::DuplicateSeed(seed.name));
        }

        let Some(record) = self.source.read_record(&seed.name)? else {
            warn!(seed = %seed.name, "no trace record, skipping");
            self.skip(seed.name.clone(), SkipReason::MissingTrace);
            return Err(TraceError::MissingTrace(seed.name));
        };

        let vector = match parse_record_bytes(&record, self.delimiter, self.width) {
            Ok(vector) => vector,
            Err(reason) => {
                warn!(seed = %seed.name, %reason, "dropping malformed trace");
                self.skip(seed.name.clone(), SkipReason::Malformed(reason.clone()));
                return Err(TraceError::Malformed {
                    seed: seed.name,
                    source: reason,
                });
            }
        };

        let id = self.seeds.len() as SeedId;
        debug!(id, seed = %seed.name, nnz = vector.nnz(), "checked trace");
        self.names.insert(seed.name.clone());
        self.seeds.push(seed);

        Ok(id)
    }

    /// Remember a seed that was left out
    pub fn skip(&mut self, name: impl Into<String>, reason: SkipReason) {
        self.skipped.push(SkippedSeed {
            name: name.into(),
            reason,
        });
    }

    /// Add every seed of a corpus scan.
    ///
    /// Unnamed files and seeds with no trace or a malformed record are
    /// skipped. Any other failure aborts ingestion.
    pub fn add_scan(mut self, scan: SeedScan) -> Result<Self, TraceError> {
        info!(count = scan.seeds.len(), "ingesting seeds");

        for path in scan.unnamed {
            self.skip(path.to_string_lossy(), SkipReason::InvalidName);
        }

        for seed in scan.seeds {
            match self.add_seed(seed) {
                Ok(_) | Err(TraceError::MissingTrace(_)) | Err(TraceError::Malformed { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(self)
    }

    /// Build the immutable store
    pub fn build(self) -> TraceStore {
        info!(
            seeds = self.seeds.len(),
            skipped = self.skipped.len(),
            "trace store ready"
        );
        TraceStore {
            width: self.width,
            delimiter: self.delimiter,
            seeds: self.seeds,
            skipped: self.skipped,
            source: self.source,
        }
    }
}

impl TraceStore {
    /// Number of usable seeds
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Feature width shared by every vector
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn seed(&self, id: SeedId) -> Option<&Seed> {
        self.seeds.get(id as usize)
    }

    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    /// Look up a seed id by name
    pub fn find(&self, name: &str) -> Option<SeedId> {
        self.seeds
            .iter()
            .position(|s| s.name == name)
            .map(|i| i as SeedId)
    }

    /// Seeds dropped during ingestion
    pub fn skipped(&self) -> &[SkippedSeed] {
        &self.skipped
    }

    /// Read and decode the vector of one seed.
    ///
    /// The record was valid at ingestion; if it has since disappeared or
    /// changed into something malformed that is an error.
    pub fn load(&self, id: SeedId) -> Result<CoverageVector, TraceError> {
        let seed = self.seed(id).ok_or(TraceError::UnknownSeed(id))?;
        let record = self
            .source
            .read_record(&seed.name)?
            .ok_or_else(|| TraceError::MissingTrace(seed.name.clone()))?;

        parse_record_bytes(&record, self.delimiter, self.width).map_err(|source| {
            TraceError::Malformed {
                seed: seed.name.clone(),
                source,
            }
        })
    }

    /// Decode the vectors of the given seeds, in order
    pub fn load_many(&self, ids: &[SeedId]) -> Result<Vec<CoverageVector>, TraceError> {
        ids.iter().map(|&id| self.load(id)).collect()
    }

    /// Decode the vectors of a contiguous id range
    pub fn load_range(&self, range: Range<usize>) -> Result<Vec<CoverageVector>, TraceError> {
        range.map(|i| self.load(i as SeedId)).collect()
    }
}
