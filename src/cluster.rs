use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{Error, Result};

/// Points currently assigned to one centroid, stored as row indices into the
/// point matrix. Indices are kept in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cluster {
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Copies the member points out of `data`, one row per member.
    pub fn points(&self, data: &ArrayView2<f64>) -> Array2<f64> {
        data.select(Axis(0), &self.members)
    }
}

/// Groups assignment records `(cluster, point)` into `k` clusters.
///
/// This is the single writer of the membership lists for one iteration.
pub(crate) fn group_records(
    k: usize,
    batches: impl IntoIterator<Item = Vec<(usize, usize)>>,
) -> Vec<Cluster> {
    let mut clusters = vec![Cluster::default(); k];
    for batch in batches {
        for (cluster, point) in batch {
            clusters[cluster].members.push(point);
        }
    }
    for cluster in clusters.iter_mut() {
        cluster.members.sort_unstable();
    }
    clusters
}

/// Builds a point matrix from rows that may disagree on their length.
pub fn points_from_rows(rows: &[Vec<f64>], dimension: usize) -> Result<Array2<f64>> {
    let mut flat = Vec::with_capacity(rows.len() * dimension);
    for (index, row) in rows.iter().enumerate() {
        if row.len() != dimension {
            return Err(Error::DimensionMismatch {
                index,
                expected: dimension,
                found: row.len(),
            });
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), dimension), flat)
        .map_err(|e| Error::InvalidConfig(e.to_string()))
}
