//! Execution strategies for the two per-iteration workloads.
//!
//! The iteration controller is written once against [`Execution`]. The
//! [`Sequential`] strategy is the reference path; [`WorkerPool`] fans the
//! same work out to a fixed set of threads and merges the partial results
//! on the calling thread.

mod pool;
mod sequential;

use std::ops::Range;

use ndarray::{Array2, ArrayView2};

use crate::centroid::EmptyClusterPolicy;
use crate::cluster::Cluster;

pub use pool::WorkerPool;
pub use sequential::Sequential;

/// Runs the assignment and recompute phases of one Lloyd iteration.
///
/// Callers pass shapes that were already validated: every centroid has as
/// many coordinates as every point, and `clusters.len() == previous.nrows()`.
pub trait Execution {
    /// Groups every point under its nearest centroid.
    fn assign(&self, data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Vec<Cluster>;

    /// Computes the next centroid set, one row per cluster.
    fn recompute(
        &self,
        data: &ArrayView2<f64>,
        clusters: &[Cluster],
        previous: &ArrayView2<f64>,
        policy: EmptyClusterPolicy,
    ) -> Array2<f64>;
}

impl<E: Execution + ?Sized> Execution for &E {
    fn assign(&self, data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Vec<Cluster> {
        (**self).assign(data, centroids)
    }

    fn recompute(
        &self,
        data: &ArrayView2<f64>,
        clusters: &[Cluster],
        previous: &ArrayView2<f64>,
        policy: EmptyClusterPolicy,
    ) -> Array2<f64> {
        (**self).recompute(data, clusters, previous, policy)
    }
}

/// Splits `0..n` into `parts` contiguous ranges of `n / parts` points each.
/// The last range absorbs the remainder.
pub fn partition(n: usize, parts: usize) -> Vec<Range<usize>> {
    assert!(parts > 0);
    let chunk = n / parts;
    (0..parts)
        .map(|i| {
            let start = chunk * i;
            let end = if i == parts - 1 { n } else { chunk * (i + 1) };
            start..end
        })
        .collect()
}
