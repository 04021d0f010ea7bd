//! Euclidean distance and nearest-centroid lookup.

use ndarray::{ArrayBase, ArrayView2, Axis, Data, Ix1};

/// Sum of squared coordinate differences.
pub fn squared_distance<S1, S2>(x: &ArrayBase<S1, Ix1>, y: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum()
}

/// Euclidean distance between two points of equal dimension.
pub fn distance<S1, S2>(x: &ArrayBase<S1, Ix1>, y: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    squared_distance(x, y).sqrt()
}

/// Index of the centroid closest to `point`.
///
/// Only a strictly smaller distance replaces the current best, so ties go to
/// the lowest index. Both execution strategies go through this function.
pub fn nearest_centroid<S>(centroids: &ArrayView2<f64>, point: &ArrayBase<S, Ix1>) -> usize
where
    S: Data<Elem = f64>,
{
    let mut min_dist = f64::INFINITY;
    let mut min_j = 0;
    for (j, c) in centroids.axis_iter(Axis(0)).enumerate() {
        let dist = squared_distance(point, &c);
        if dist < min_dist {
            min_dist = dist;
            min_j = j;
        }
    }
    min_j
}

/// Sum of `distance` between centroids matched by row index.
pub fn total_movement(old: &ArrayView2<f64>, new: &ArrayView2<f64>) -> f64 {
    old.axis_iter(Axis(0))
        .zip(new.axis_iter(Axis(0)))
        .map(|(a, b)| distance(&a, &b))
        .sum()
}
