use crate::reducer::ProjectedPoint;

/// Mean of a set of points, `None` when the set is empty
pub fn compute_centroid<'a>(points: impl IntoIterator<Item = &'a ProjectedPoint>) -> Option<ProjectedPoint> {
    let mut out = ProjectedPoint::default();
    let mut n = 0usize;

    for p in points {
        out.x += p.x;
        out.y += p.y;
        n += 1;
    }

    if n == 0 {
        return None;
    }

    out.x /= n as f64;
    out.y /= n as f64;

    Some(out)
}
