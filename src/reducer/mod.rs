//! Dimensionality reduction of coverage vectors to 2-D points.

mod batcher;
mod svd;
mod types;


pub use batcher::{Batcher, DEFAULT_BATCH_SIZE};
pub use svd::{N_COMPONENTS, TruncatedSvd};
pub use types::ProjectedPoint;
