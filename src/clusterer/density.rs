use super::{bandwidth::estimate_bandwidth, meanshift::MeanShift, types::ClusterResult};
use crate::reducer::ProjectedPoint;
use rand::Rng;
use tracing::info;

pub const DEFAULT_QUANTILE: f64 = 0.2;
pub const DEFAULT_DAMPING: f64 = 2.5;
pub const DEFAULT_BANDWIDTH_SAMPLE_CAP: usize = 1000;

/// Bandwidth estimation followed by mean-shift.
///
/// The estimated bandwidth is divided by `damping` before clustering, which
/// yields finer clusters than the raw estimate would.
#[derive(Debug, Clone)]
pub struct DensityClusterer {
    pub quantile: f64,
    pub damping: f64,
    pub sample_cap: Option<usize>,
    /// Skip estimation and use this (already damped) bandwidth
    pub fixed_bandwidth: Option<f64>,
    pub bin_seeding: bool,
    pub max_iterations: usize,
}

impl DensityClusterer {
    pub fn new() -> Self {
        Self {
            quantile: DEFAULT_QUANTILE,
            damping: DEFAULT_DAMPING,
            sample_cap: Some(DEFAULT_BANDWIDTH_SAMPLE_CAP),
            fixed_bandwidth: None,
            bin_seeding: true,
            max_iterations: super::meanshift::DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Bandwidth that [`Self::cluster`] will run with
    pub fn bandwidth<R: Rng + ?Sized>(&self, points: &[ProjectedPoint], rng: &mut R) -> f64 {
        if let Some(fixed) = self.fixed_bandwidth {
            return fixed;
        }
        let raw = estimate_bandwidth(points, self.quantile, self.sample_cap, rng);
        let damped = raw / self.damping;
        info!(raw, damped, "estimated bandwidth");
        damped
    }

    pub fn cluster<R: Rng + ?Sized>(&self, points: &[ProjectedPoint], rng: &mut R) -> ClusterResult {
        let bandwidth = self.bandwidth(points, rng);
        let result = MeanShift::new(bandwidth)
            .bin_seeding(self.bin_seeding)
            .max_iterations(self.max_iterations)
            .fit(points);

        info!(
            points = points.len(),
            clusters = result.len(),
            degenerate = result.degenerate,
            "clustered"
        );
        result
    }
}

impl Default for DensityClusterer {
    fn default() -> Self {
        Self::new()
    }
}
