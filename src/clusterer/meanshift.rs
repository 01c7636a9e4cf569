use super::{
    centroid::compute_centroid,
    grid::{bin_seeds, SpatialGrid},
    types::{Cluster, ClusterResult},
};
use crate::corpus::SeedId;
use crate::reducer::ProjectedPoint;
use tracing::{debug, warn};

pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// A seed has converged once a shift moves it less than this fraction of
/// the bandwidth.
const CONVERGENCE: f64 = 1e-3;

/// Flat-kernel mean-shift over 2-D points
#[derive(Debug, Clone)]
pub struct MeanShift {
    pub bandwidth: f64,
    pub bin_seeding: bool,
    pub min_bin_freq: usize,
    pub max_iterations: usize,
}

impl MeanShift {
    pub fn new(bandwidth: f64) -> Self {
        Self {
            bandwidth,
            bin_seeding: true,
            min_bin_freq: 1,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Seed from grid bins instead of from every point
    pub fn bin_seeding(mut self, enabled: bool) -> Self {
        self.bin_seeding = enabled;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Cluster `points`; point `i` is reported as seed id `i`.
    pub fn fit(&self, points: &[ProjectedPoint]) -> ClusterResult {
        if points.is_empty() {
            return ClusterResult {
                clusters: vec![],
                labels: vec![],
                bandwidth: self.bandwidth,
                degenerate: false,
            };
        }

        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            warn!(bandwidth = self.bandwidth, "degenerate bandwidth, using a single cluster");
            return single_cluster(points, self.bandwidth);
        }

        let grid = SpatialGrid::new(points, self.bandwidth);
        let seeds = self.seeds(points);

        // 1. Climb every seed to its mode
        let mut modes: Vec<(ProjectedPoint, usize)> =
            seeds.iter().filter_map(|s| self.climb(&grid, *s)).collect();

        // 2. Densest modes first, exact duplicates collapsed
        modes.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then(a.0.x.total_cmp(&b.0.x))
                .then(a.0.y.total_cmp(&b.0.y))
        });
        modes.dedup_by(|a, b| a.0 == b.0);

        // 3. Drop modes inside the window of a denser one
        let mut centers: Vec<ProjectedPoint> = Vec::new();
        for (mode, _) in &modes {
            if centers.iter().all(|c| c.distance(mode) > self.bandwidth) {
                centers.push(*mode);
            }
        }

        if centers.is_empty() {
            warn!("mean-shift found no modes, using a single cluster");
            return single_cluster(points, self.bandwidth);
        }

        // 4. Every point joins its nearest mode
        let mut members: Vec<Vec<SeedId>> = vec![Vec::new(); centers.len()];
        for (i, p) in points.iter().enumerate() {
            members[nearest(&centers, p)].push(i as SeedId);
        }

        let mut clusters = Vec::with_capacity(centers.len());
        for (center, members) in centers.into_iter().zip(members) {
            if members.is_empty() {
                continue;
            }
            clusters.push(Cluster {
                id: clusters.len() as u32,
                members,
                center,
            });
        }

        let mut labels = vec![0u32; points.len()];
        for cluster in &clusters {
            for &m in &cluster.members {
                labels[m as usize] = cluster.id;
            }
        }

        debug!(
            seeds = seeds.len(),
            modes = modes.len(),
            clusters = clusters.len(),
            "mean-shift finished"
        );

        ClusterResult {
            clusters,
            labels,
            bandwidth: self.bandwidth,
            degenerate: false,
        }
    }

    fn seeds(&self, points: &[ProjectedPoint]) -> Vec<ProjectedPoint> {
        if self.bin_seeding {
            let binned = bin_seeds(points, self.bandwidth, self.min_bin_freq);
            if !binned.is_empty() && binned.len() < points.len() {
                return binned;
            }
        }
        points.to_vec()
    }

    fn climb(&self, grid: &SpatialGrid<'_>, start: ProjectedPoint) -> Option<(ProjectedPoint, usize)> {
        let mut mean = start;
        let mut population = 0;

        for _ in 0..self.max_iterations {
            let window = grid.within(&mean, self.bandwidth);
            let Some(next) = compute_centroid(window.iter().map(|&i| grid.point(i))) else {
                break;
            };

            population = window.len();
            let shift = next.distance(&mean);
            mean = next;

            if shift <= CONVERGENCE * self.bandwidth {
                break;
            }
        }

        (population > 0).then_some((mean, population))
    }
}

fn nearest(centers: &[ProjectedPoint], p: &ProjectedPoint) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (c, center) in centers.iter().enumerate() {
        let d = center.distance_squared(p);
        if d < best_d {
            best = c;
            best_d = d;
        }
    }
    best
}

pub(super) fn single_cluster(points: &[ProjectedPoint], bandwidth: f64) -> ClusterResult {
    let center = compute_centroid(points).unwrap_or_default();
    ClusterResult {
        clusters: vec![Cluster {
            id: 0,
            members: (0..points.len() as SeedId).collect(),
            center,
        }],
        labels: vec![0; points.len()],
        bandwidth,
        degenerate: true,
    }
}
