//! Centroid recomputation as the coordinate-wise mean of a cluster.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::cluster::Cluster;

/// What to do with a centroid whose cluster lost all of its members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Keep the centroid from the previous iteration unchanged.
    #[default]
    KeepPrevious,
}

/// Mean of the member points, or `None` when the cluster is empty.
///
/// Members are summed in ascending index order.
pub fn mean(data: &ArrayView2<f64>, cluster: &Cluster) -> Option<Array1<f64>> {
    if cluster.is_empty() {
        return None;
    }
    let mut acc = Array1::<f64>::zeros(data.ncols());
    for &idx in &cluster.members {
        acc.zip_mut_with(&data.row(idx), |a, &b| *a += b);
    }
    let count = cluster.len() as f64;
    acc.mapv_inplace(|v| v / count);
    Some(acc)
}

/// New centroid for one cluster, applying `policy` when it is empty.
pub fn recompute(
    data: &ArrayView2<f64>,
    cluster: &Cluster,
    previous: ArrayView1<f64>,
    policy: EmptyClusterPolicy,
) -> Array1<f64> {
    match mean(data, cluster) {
        Some(centroid) => centroid,
        None => match policy {
            EmptyClusterPolicy::KeepPrevious => {
                tracing::debug!("empty cluster keeps its previous centroid");
                previous.to_owned()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mean_is_coordinate_wise() {
        let data = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [9.0, 9.0]];
        let cluster = Cluster {
            members: vec![0, 1, 2],
        };
        let m = mean(&data.view(), &cluster).unwrap();
        assert!((m[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((m[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_cluster_keeps_previous() {
        let data = array![[1.0, 2.0]];
        let previous = array![7.0, -3.0];
        assert!(mean(&data.view(), &Cluster::default()).is_none());
        let c = recompute(
            &data.view(),
            &Cluster::default(),
            previous.view(),
            EmptyClusterPolicy::KeepPrevious,
        );
        assert_eq!(c, previous);
        assert!(c.iter().all(|v| v.is_finite()));
    }
}
