use super::{Batcher, ProjectedPoint};
use crate::error::ReduceError;
use crate::trace::{CoverageVector, TraceError, TraceStore};
use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, info};

/// Number of retained directions
pub const N_COMPONENTS: usize = 2;

/// Eigenvalues at or below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-9;

/// Rank-2 truncated SVD over sparse coverage vectors.
///
/// The model is fit once on a sample and then reused unchanged for every
/// transform, so all projected points share one coordinate system. Vectors
/// are not centred.
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    width: usize,
    components: [Vec<f64>; N_COMPONENTS],
    singular_values: [f64; N_COMPONENTS],
}

impl TruncatedSvd {
    /// Fit the two leading right-singular vectors of the sample matrix.
    ///
    /// Works on the m×m Gram matrix `X Xᵀ` rather than the m×width data
    /// matrix: with eigenpairs `(λ, u)` of the Gram matrix, `σ = √λ` and the
    /// component is `Xᵀu / σ`.
    pub fn fit(sample: &[CoverageVector]) -> Result<Self, ReduceError> {
        let m = sample.len();
        if m < N_COMPONENTS {
            return Err(ReduceError::InsufficientSample { available: m });
        }

        let width = sample.iter().map(|v| v.width()).max().unwrap_or(0);
        let gram = DMatrix::<f64>::from_fn(m, m, |i, j| sample[i].dot(&sample[j]));
        let eigen = SymmetricEigen::new(gram);

        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
        let largest = eigen.eigenvalues[order[0]];

        let mut components: [Vec<f64>; N_COMPONENTS] = [vec![0.0; width], vec![0.0; width]];
        let mut singular_values = [0.0; N_COMPONENTS];

        for (slot, &k) in order.iter().take(N_COMPONENTS).enumerate() {
            let lambda = eigen.eigenvalues[k];
            if largest <= 0.0 || lambda <= RANK_TOLERANCE * largest {
                debug!(component = slot, lambda, "component has no variance, left at zero");
                continue;
            }

            let sigma = lambda.sqrt();
            let u = eigen.eigenvectors.column(k);
            let component = &mut components[slot];

            for (row, vector) in sample.iter().enumerate() {
                let weight = u[row] / sigma;
                for &(s, value) in vector.entries() {
                    component[s as usize] += weight * value as f64;
                }
            }

            flip_sign(component);
            singular_values[slot] = sigma;
        }

        info!(
            samples = m,
            width,
            sigma_1 = singular_values[0],
            sigma_2 = singular_values[1],
            "fitted projection"
        );

        Ok(Self {
            width,
            components,
            singular_values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn components(&self) -> &[Vec<f64>; N_COMPONENTS] {
        &self.components
    }

    pub fn singular_values(&self) -> [f64; N_COMPONENTS] {
        self.singular_values
    }

    /// Number of components carrying variance (0, 1 or 2)
    pub fn rank(&self) -> usize {
        self.singular_values.iter().filter(|s| **s > 0.0).count()
    }

    pub fn transform_one(&self, vector: &CoverageVector) -> ProjectedPoint {
        ProjectedPoint::new(
            vector.dot_dense(&self.components[0]),
            vector.dot_dense(&self.components[1]),
        )
    }

    pub fn transform(&self, vectors: &[CoverageVector]) -> Vec<ProjectedPoint> {
        vectors.iter().map(|v| self.transform_one(v)).collect()
    }

    /// Project every seed of `store` lazily, `batch_size` seeds at a time.
    ///
    /// Each step decodes one batch of raw vectors from the store, projects
    /// it and drops the vectors before yielding the points.
    pub fn transform_batches<'a>(
        &'a self,
        store: &'a TraceStore,
        batch_size: usize,
    ) -> impl Iterator<Item = Result<Vec<ProjectedPoint>, TraceError>> + 'a {
        Batcher::new(batch_size)
            .ranges(store.len())
            .map(move |range| -> Result<Vec<ProjectedPoint>, TraceError> {
                let vectors = store.load_range(range)?;
                Ok(self.transform(&vectors))
            })
    }
}

/// Make the largest-magnitude entry positive so a fit is sign-stable.
fn flip_sign(component: &mut [f64]) {
    let pivot = component
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0);

    if pivot < 0.0 {
        component.iter_mut().for_each(|c| *c = -*c);
    }
}
