//! End-to-end reduction: sample, fit, project, cluster, select, write.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::{debug, info};

use crate::clusterer::{ClusterResult, DensityClusterer};
use crate::config::ReduceConfig;
use crate::error::ReduceError;
use crate::output::OutputWriter;
use crate::reducer::{ProjectedPoint, TruncatedSvd};
use crate::sampler::VectorSampler;
use crate::selector::{SeedSelector, SelectionSet};
use crate::corpus::collect_seeds;
use crate::trace::{TraceDir, TraceError, TraceFile, TraceStore, TraceStoreBuilder};

/// Everything a successful reduction computed
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Projected point of every seed, indexed by seed id
    pub points: Vec<ProjectedPoint>,
    pub clusters: ClusterResult,
    pub selection: SelectionSet,
    /// Seed of the RNG that drove sampling, bandwidth estimation and selection
    pub rng_seed: u64,
    /// Number of vectors the projection was fitted on
    pub sample_size: usize,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No usable seeds; nothing was written
    EmptyCorpus,
    Reduced(Reduction),
}

pub struct Pipeline {
    config: ReduceConfig,
}

impl Pipeline {
    pub fn new(config: ReduceConfig) -> Result<Self, ReduceError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReduceConfig {
        &self.config
    }

    /// Discover seeds and check their trace records according to the config.
    ///
    /// `traces` is either a directory with one trace file per seed or a
    /// single file of keyed rows.
    pub fn load_store(&self, seed_dir: &Path, traces: &Path) -> Result<TraceStore, ReduceError> {
        let scan = collect_seeds(seed_dir).map_err(TraceError::from)?;
        let width = self.config.feature_width;

        let builder = if traces.is_file() {
            TraceStoreBuilder::new(width, TraceFile::open(traces, self.config.delimiter)?)
        } else {
            TraceStoreBuilder::new(
                width,
                TraceDir::new(traces, self.config.trace_suffix.as_str()),
            )
        };

        let store = builder
            .delimiter(self.config.delimiter)
            .add_scan(scan)?
            .build();
        Ok(store)
    }

    fn clusterer(&self) -> DensityClusterer {
        DensityClusterer {
            quantile: self.config.bandwidth_quantile,
            damping: self.config.bandwidth_damping,
            sample_cap: self.config.bandwidth_sample_cap,
            fixed_bandwidth: self.config.bandwidth,
            bin_seeding: self.config.bin_seeding,
            max_iterations: self.config.max_iterations,
        }
    }

    /// Compute clusters and the selection. Trace records are read, nothing
    /// is written.
    pub fn reduce(&self, store: &TraceStore) -> Result<RunOutcome, ReduceError> {
        if store.is_empty() {
            info!("no usable seeds, nothing to do");
            return Ok(RunOutcome::EmptyCorpus);
        }

        let rng_seed = self.config.seed.unwrap_or_else(rand::random);
        info!(rng_seed, seeds = store.len(), "starting reduction");
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);

        // 1. Fit the projection on a bounded sample
        let sample = VectorSampler::new(self.config.sample_cap).sample(store, &mut rng)?;
        let sample_size = sample.len();
        let svd = TruncatedSvd::fit(&sample)?;
        drop(sample);

        // 2. Project the whole corpus batch by batch
        let mut points = Vec::with_capacity(store.len());
        for (i, batch) in svd
            .transform_batches(store, self.config.batch_size)
            .enumerate()
        {
            let batch = batch?;
            debug!(batch = i, size = batch.len(), "projected batch");
            points.extend(batch);
        }

        // 3. Cluster
        let clusters = self.clusterer().cluster(&points, &mut rng);

        // 4. Select representatives
        let selection = SeedSelector::new(self.config.per_cluster)
            .prefer_overlap(self.config.prefer_overlap)
            .select(&clusters.clusters, &mut rng);

        info!(
            clusters = clusters.len(),
            selected = selection.len(),
            "reduction complete"
        );

        Ok(RunOutcome::Reduced(Reduction {
            points,
            clusters,
            selection,
            rng_seed,
            sample_size,
        }))
    }

    /// Load, reduce and copy the selection into `output_dir`.
    ///
    /// Nothing is written unless the whole selection was computed.
    pub fn run(&self, seed_dir: &Path, traces: &Path, output_dir: &Path) -> Result<RunOutcome, ReduceError> {
        let store = self.load_store(seed_dir, traces)?;
        let outcome = self.reduce(&store)?;

        if let RunOutcome::Reduced(reduction) = &outcome {
            OutputWriter::new(output_dir).write(&store, &reduction.selection)?;
        }

        Ok(outcome)
    }
}
