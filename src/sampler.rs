use crate::corpus::SeedId;
use crate::trace::{CoverageVector, TraceError, TraceStore};
use rand::Rng;
use tracing::debug;

/// Default cap on the number of vectors used to fit the projection
pub const DEFAULT_SAMPLE_CAP: usize = 500;

/// Draws a bounded uniform sample of seeds for fitting the reducer
#[derive(Debug, Clone, Copy)]
pub struct VectorSampler {
    pub cap: usize,
}

impl VectorSampler {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Pick `min(len, cap)` distinct seed ids uniformly at random.
    ///
    /// Ids come back in ascending order.
    pub fn sample_ids<R: Rng + ?Sized>(&self, store: &TraceStore, rng: &mut R) -> Vec<SeedId> {
        let n = store.len();
        let k = n.min(self.cap);

        let mut ids: Vec<SeedId> = if k == n {
            (0..n as SeedId).collect()
        } else {
            rand::seq::index::sample(rng, n, k)
                .into_iter()
                .map(|i| i as SeedId)
                .collect()
        };
        ids.sort_unstable();

        debug!(population = n, sampled = ids.len(), "sampled vectors for fit");
        ids
    }

    /// Same as [`Self::sample_ids`] but decodes the sampled vectors.
    ///
    /// Only these vectors are read from the store's trace source.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        store: &TraceStore,
        rng: &mut R,
    ) -> Result<Vec<CoverageVector>, TraceError> {
        store.load_many(&self.sample_ids(store, rng))
    }
}

impl Default for VectorSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_CAP)
    }
}
