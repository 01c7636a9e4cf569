use crate::reducer::ProjectedPoint;
use rand::Rng;

/// Estimate a mean-shift bandwidth from neighbour distances.
///
/// Works on at most `sample_cap` points drawn at random. With `m` points in
/// play and `k = max(1, ⌊m·quantile⌋)`, each point contributes its distance
/// to the k-th nearest other point, and the estimate is the mean of those
/// distances. Coincident neighbours (distance 0) are not counted; a point
/// with fewer than `k` distinct neighbours uses its farthest one, and a
/// point with none is left out.
///
/// Returns 0.0 when nothing can be measured.
pub fn estimate_bandwidth<R: Rng + ?Sized>(
    points: &[ProjectedPoint],
    quantile: f64,
    sample_cap: Option<usize>,
    rng: &mut R,
) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let chosen: Vec<ProjectedPoint> = match sample_cap {
        Some(cap) if cap < n => {
            let mut idx = rand::seq::index::sample(rng, n, cap.max(2)).into_vec();
            idx.sort_unstable();
            idx.into_iter().map(|i| points[i]).collect()
        }
        _ => points.to_vec(),
    };

    let m = chosen.len();
    let k = ((m as f64 * quantile) as usize).max(1);

    let mut total = 0.0;
    let mut counted = 0usize;
    let mut distances = Vec::with_capacity(m);

    for (i, p) in chosen.iter().enumerate() {
        distances.clear();
        distances.extend(
            chosen
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, q)| p.distance(q))
                .filter(|d| *d > 0.0),
        );

        if distances.is_empty() {
            continue;
        }

        let nth = k.min(distances.len()) - 1;
        let (_, kth, _) = distances.select_nth_unstable_by(nth, |a, b| a.total_cmp(b));
        total += *kth;
        counted += 1;
    }

    if counted == 0 {
        return 0.0;
    }

    total / counted as f64
}
