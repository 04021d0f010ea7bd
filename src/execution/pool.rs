use crossbeam_channel::{bounded, unbounded};
use ndarray::{Array1, Array2, ArrayView2};

use super::{partition, Execution};
use crate::centroid::{recompute, EmptyClusterPolicy};
use crate::cluster::{group_records, Cluster};
use crate::error::{Error, Result};
use crate::geometry::nearest_centroid;

/// Fixed pool of worker threads.
///
/// Workers only read the point matrix and the centroid snapshot of the
/// current iteration. Their results travel over channels to the calling
/// thread, which is the only writer of the merged clusters and centroids
/// and returns only once every expected result has arrived.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Builds a pool of `workers` threads.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidConfig(
                "worker count must be greater than zero".into(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pkmeans-worker-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}

impl Execution for WorkerPool {
    /// One job per contiguous range of points; each job sends back a single
    /// batch of `(cluster, point)` records.
    fn assign(&self, data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Vec<Cluster> {
        let ranges = partition(data.nrows(), self.workers);
        let expected = ranges.len();
        let (batch_tx, batch_rx) = unbounded::<Vec<(usize, usize)>>();

        self.pool.in_place_scope(|s| {
            for range in ranges {
                let batch_tx = batch_tx.clone();
                s.spawn(move |_| {
                    let batch = range
                        .map(|i| (nearest_centroid(centroids, &data.row(i)), i))
                        .collect::<Vec<_>>();
                    // The receiver outlives the scope.
                    let _ = batch_tx.send(batch);
                });
            }
            drop(batch_tx);

            let clusters = group_records(centroids.nrows(), batch_rx.iter().take(expected));
            debug_assert_eq!(
                clusters.iter().map(Cluster::len).sum::<usize>(),
                data.nrows()
            );
            clusters
        })
    }

    /// `min(workers, k)` jobs pull cluster tasks from a rendezvous channel
    /// until it is closed.
    fn recompute(
        &self,
        data: &ArrayView2<f64>,
        clusters: &[Cluster],
        previous: &ArrayView2<f64>,
        policy: EmptyClusterPolicy,
    ) -> Array2<f64> {
        let k = clusters.len();
        let jobs = self.workers.min(k);
        let (task_tx, task_rx) = bounded::<(usize, &Cluster)>(0);
        let (result_tx, result_rx) = unbounded::<(usize, Array1<f64>)>();
        let mut next = previous.to_owned();

        self.pool.in_place_scope(|s| {
            for _ in 0..jobs {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move |_| {
                    for (index, cluster) in task_rx.iter() {
                        let centroid = recompute(data, cluster, previous.row(index), policy);
                        if result_tx.send((index, centroid)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(task_rx);
            drop(result_tx);

            for task in clusters.iter().enumerate() {
                if task_tx.send(task).is_err() {
                    break;
                }
            }
            drop(task_tx);

            let mut merged = 0;
            for (index, centroid) in result_rx.iter().take(k) {
                next.row_mut(index).assign(&centroid);
                merged += 1;
            }
            debug_assert_eq!(merged, k);
        });

        next
    }
}
