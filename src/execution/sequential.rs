use ndarray::{Array2, ArrayView2, Axis};

use super::Execution;
use crate::centroid::{recompute, EmptyClusterPolicy};
use crate::cluster::{group_records, Cluster};
use crate::geometry::nearest_centroid;

/// Single-threaded execution on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Execution for Sequential {
    fn assign(&self, data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Vec<Cluster> {
        let records = data
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(i, point)| (nearest_centroid(centroids, &point), i))
            .collect::<Vec<_>>();
        group_records(centroids.nrows(), [records])
    }

    fn recompute(
        &self,
        data: &ArrayView2<f64>,
        clusters: &[Cluster],
        previous: &ArrayView2<f64>,
        policy: EmptyClusterPolicy,
    ) -> Array2<f64> {
        let mut next = previous.to_owned();
        for (index, cluster) in clusters.iter().enumerate() {
            let centroid = recompute(data, cluster, previous.row(index), policy);
            next.row_mut(index).assign(&centroid);
        }
        next
    }
}
