//! Density clustering of projected points.
//!
//! The number of groups is not known up front, so clustering is mean-shift
//! with an automatically estimated bandwidth rather than a fixed-k method.

mod bandwidth;
mod centroid;
mod density;
mod grid;
mod meanshift;
mod types;


pub use bandwidth::estimate_bandwidth;
pub use centroid::compute_centroid;
pub use density::{
    DEFAULT_BANDWIDTH_SAMPLE_CAP, DEFAULT_DAMPING, DEFAULT_QUANTILE, DensityClusterer,
};
pub use grid::{bin_seeds, SpatialGrid};
pub use meanshift::{DEFAULT_MAX_ITERATIONS, MeanShift};
pub use types::{Cluster, ClusterResult};
