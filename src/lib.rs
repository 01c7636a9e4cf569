// Public API exports
pub mod clusterer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod reducer;
pub mod sampler;
pub mod selector;
pub mod trace;

// Re-export main types for convenience
pub use corpus::{collect_seeds, CorpusError, Seed, SeedId, SeedScan};
pub use trace::{
    parse_record, CoverageVector, RecordError, SkipReason, SkippedSeed, TraceDir, TraceError,
    TraceFile, TraceSource, TraceStore, TraceStoreBuilder,
};

pub use sampler::VectorSampler;

pub use reducer::{Batcher, ProjectedPoint, TruncatedSvd};

pub use clusterer::{estimate_bandwidth, Cluster, ClusterResult, DensityClusterer, MeanShift};

pub use selector::{ClusterPick, SeedSelector, SelectionSet};

pub use output::{OutputError, OutputWriter, RunReport};

pub use config::ReduceConfig;
pub use error::ReduceError;
pub use pipeline::{Pipeline, Reduction, RunOutcome};
