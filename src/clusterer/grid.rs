use crate::reducer::ProjectedPoint;
use std::collections::{BTreeMap, HashMap};

type Cell = (i64, i64);

/// Uniform grid over 2-D points for fixed-radius neighbour queries.
///
/// Queries are only exact for radii no larger than the cell size.
pub struct SpatialGrid<'a> {
    points: &'a [ProjectedPoint],
    cell: f64,
    cells: HashMap<Cell, Vec<u32>>,
}

impl<'a> SpatialGrid<'a> {
    pub fn new(points: &'a [ProjectedPoint], cell: f64) -> Self {
        let mut cells: HashMap<Cell, Vec<u32>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            cells.entry(cell_of(p, cell)).or_default().push(i as u32);
        }

        Self {
            points,
            cell,
            cells,
        }
    }

    /// Indices of points within `radius` (inclusive) of `center`
    pub fn within(&self, center: &ProjectedPoint, radius: f64) -> Vec<u32> {
        debug_assert!(radius <= self.cell);
        let (cx, cy) = cell_of(center, self.cell);
        let limit = radius * radius;
        let mut out = Vec::new();

        for dx in -1..=1 {
            for dy in -1..=1 {
                let key = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(bucket) = self.cells.get(&key) {
                    out.extend(
                        bucket
                            .iter()
                            .copied()
                            .filter(|&i| self.points[i as usize].distance_squared(center) <= limit),
                    );
                }
            }
        }

        out
    }

    pub fn point(&self, index: u32) -> &ProjectedPoint {
        &self.points[index as usize]
    }
}

fn cell_of(p: &ProjectedPoint, cell: f64) -> Cell {
    ((p.x / cell).floor() as i64, (p.y / cell).floor() as i64)
}

/// Seed candidates for mean-shift: centres of grid bins holding at least
/// `min_freq` points, with bins of side `bin_size` centred on multiples of it.
///
/// Bins are returned in coordinate order.
pub fn bin_seeds(points: &[ProjectedPoint], bin_size: f64, min_freq: usize) -> Vec<ProjectedPoint> {
    let mut bins: BTreeMap<Cell, usize> = BTreeMap::new();
    for p in points {
        let key = ((p.x / bin_size).round() as i64, (p.y / bin_size).round() as i64);
        *bins.entry(key).or_default() += 1;
    }

    bins.into_iter()
        .filter(|(_, count)| *count >= min_freq)
        .map(|((bx, by), _)| ProjectedPoint::new(bx as f64 * bin_size, by as f64 * bin_size))
        .collect()
}
