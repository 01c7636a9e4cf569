/// One seed's coverage, stored sparsely.
///
/// Only non-zero slots are kept, sorted by slot index. `width` is the number
/// of feature slots; the trailing non-feature column of a trace record is
/// never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageVector {
    width: usize,
    entries: Vec<(u32, f32)>,
}

impl CoverageVector {
    /// Build from a dense slice, dropping zero slots
    #[cfg(test)]
    pub(crate) fn from_dense(values: &[f32]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i as u32, *v))
            .collect();

        Self {
            width: values.len(),
            entries,
        }
    }

    /// Entries must be sorted by slot, unique, in range and non-zero.
    pub(super) fn from_sorted(width: usize, entries: Vec<(u32, f32)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { width, entries }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of non-zero slots
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    #[cfg(test)]
    pub(crate) fn to_dense(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.width];
        for &(i, v) in &self.entries {
            out[i as usize] = v;
        }
        out
    }

    /// Inner product with another sparse vector
    pub fn dot(&self, other: &CoverageVector) -> f64 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0f64;

        while a < self.entries.len() && b < other.entries.len() {
            let (ia, va) = self.entries[a];
            let (ib, vb) = other.entries[b];
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += va as f64 * vb as f64;
                    a += 1;
                    b += 1;
                }
            }
        }

        sum
    }

    /// Inner product with a dense vector. Slots past the end of `dense`
    /// count as zero.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(i, v)| dense.get(i as usize).map_or(0.0, |d| v as f64 * d))
            .sum()
    }
}
