pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        sum += (x - y).powi(2);
    }
    sum
}

pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Index of the point in `candidates` nearest to `point`.
///
/// Ties keep the earliest index. Returns `None` for an empty iterator.
pub fn nearest<'a, I>(point: &[f64], candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, &'a [f64])>,
{
    let mut best_distance = f64::INFINITY;
    let mut best = None;
    for (idx, candidate) in candidates {
        let distance = squared_euclidean(point, candidate);
        if best.is_none() || distance < best_distance {
            best_distance = distance;
            best = Some(idx);
        }
    }
    best
}
