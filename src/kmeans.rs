use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Axis};

use crate::cluster::Cluster;
use crate::config::KMeansConfig;
use crate::error::{Error, Result};
use crate::execution::{Execution, Sequential, WorkerPool};
use crate::geometry::{distance, squared_distance, total_movement};
use crate::init::Initializer;

/// Movement and inertia recorded after one assign/recompute round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    /// Summed distance between old and new centroids.
    pub movement: f64,
    /// Sum of squared distances from each point to its cluster's new centroid.
    pub inertia: f64,
}

/// Result of a single assign/recompute round.
#[derive(Debug, Clone)]
pub struct Step {
    pub clusters: Vec<Cluster>,
    pub centroids: Array2<f64>,
    pub movement: f64,
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Final membership, one entry per centroid index.
    pub clusters: Vec<Cluster>,
    /// Centroids recomputed from `clusters`.
    pub centroids: Array2<f64>,
    pub iterations: usize,
    /// Movement of the last round.
    pub movement: f64,
    /// False when the run stopped at the iteration cap.
    pub converged: bool,
    pub history: Vec<IterationStats>,
}

impl Clustering {
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Cluster::len).collect()
    }

    /// Cluster index of every point, in point order.
    pub fn labels(&self) -> Vec<usize> {
        let n = self.clusters.iter().map(Cluster::len).sum();
        let mut labels = vec![0; n];
        for (c, cluster) in self.clusters.iter().enumerate() {
            for &idx in &cluster.members {
                labels[idx] = c;
            }
        }
        labels
    }

    /// Member points of every cluster.
    pub fn cluster_points(&self, data: &ArrayView2<f64>) -> Vec<Array2<f64>> {
        self.clusters.iter().map(|c| c.points(data)).collect()
    }

    pub fn inertia(&self, data: &ArrayView2<f64>) -> f64 {
        inertia(data, &self.clusters, &self.centroids.view())
    }

    /// Sum of plain Euclidean distances from each point to its centroid.
    pub fn total_distance(&self, data: &ArrayView2<f64>) -> f64 {
        self.clusters
            .iter()
            .enumerate()
            .flat_map(|(c, cluster)| cluster.members.iter().map(move |&idx| (c, idx)))
            .map(|(c, idx)| distance(&data.row(idx), &self.centroids.row(c)))
            .sum()
    }
}

/// Sum of squared distances from each member point to its cluster's centroid.
pub fn inertia(data: &ArrayView2<f64>, clusters: &[Cluster], centroids: &ArrayView2<f64>) -> f64 {
    clusters
        .iter()
        .enumerate()
        .map(|(c, cluster)| {
            let centroid = centroids.row(c);
            cluster
                .members
                .iter()
                .map(|&idx| squared_distance(&data.row(idx), &centroid))
                .sum::<f64>()
        })
        .sum()
}

/// Lloyd's algorithm driven by an execution strategy.
///
/// Each iteration assigns every point to its nearest centroid, recomputes
/// the centroids, and stops once the summed centroid movement is at most
/// `min_change`. Assignment of iteration `i + 1` only starts after the
/// recompute of iteration `i` has been fully merged.
#[derive(Debug)]
pub struct KMeans<E = Sequential> {
    config: KMeansConfig,
    execution: E,
    stop: Option<Arc<AtomicBool>>,
}

impl KMeans<Sequential> {
    /// Serial run on the calling thread.
    pub fn serial(config: KMeansConfig) -> Result<Self> {
        Self::with_execution(config, Sequential)
    }
}

impl KMeans<WorkerPool> {
    /// Parallel run on a pool of `config.workers` threads.
    pub fn parallel(config: KMeansConfig) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.workers)?;
        Self::with_execution(config, pool)
    }
}

impl<E: Execution> KMeans<E> {
    pub fn with_execution(config: KMeansConfig, execution: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            execution,
            stop: None,
        })
    }

    /// Aborts the run with [`Error::Cancelled`] once `stop` is raised.
    /// The flag is checked before every iteration.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn execution(&self) -> &E {
        &self.execution
    }

    /// Clusters `data` starting from the centroids chosen by `init`.
    #[tracing::instrument(skip_all, fields(points = data.nrows(), k = self.config.k))]
    pub fn fit<I>(&self, data: &ArrayView2<f64>, init: &mut I) -> Result<Clustering>
    where
        I: Initializer + ?Sized,
    {
        self.validate_data(data)?;
        let mut centroids = init.initial_centroids(data, self.config.k)?;
        self.validate_centroids(&centroids.view())?;

        let mut history = Vec::new();
        loop {
            if self.is_stopped() {
                return Err(Error::Cancelled);
            }
            let step = self.iterate(data, &centroids.view());
            let stats = IterationStats {
                movement: step.movement,
                inertia: inertia(data, &step.clusters, &step.centroids.view()),
            };
            history.push(stats);
            let iterations = history.len();
            tracing::debug!(
                iteration = iterations,
                movement = stats.movement,
                inertia = stats.inertia,
                "iteration finished"
            );

            let converged = step.movement <= self.config.min_change;
            if converged || iterations >= self.config.max_iterations {
                if converged {
                    tracing::info!(iterations, movement = step.movement, "converged");
                } else {
                    tracing::warn!(
                        iterations,
                        movement = step.movement,
                        min_change = self.config.min_change,
                        "did not converge before the iteration cap"
                    );
                }
                return Ok(Clustering {
                    clusters: step.clusters,
                    centroids: step.centroids,
                    iterations,
                    movement: step.movement,
                    converged,
                    history,
                });
            }
            centroids = step.centroids;
        }
    }

    /// Runs one assign/recompute round from `centroids`.
    pub fn step(&self, data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Result<Step> {
        self.validate_data(data)?;
        self.validate_centroids(centroids)?;
        Ok(self.iterate(data, centroids))
    }

    fn iterate(&self, data: &ArrayView2<f64>, centroids: &ArrayView2<f64>) -> Step {
        let clusters = self.execution.assign(data, centroids);
        let next = self.execution.recompute(
            data,
            &clusters,
            centroids,
            self.config.empty_cluster,
        );
        let movement = total_movement(centroids, &next.view());
        Step {
            clusters,
            centroids: next,
            movement,
        }
    }

    fn is_stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::Relaxed))
    }

    fn validate_data(&self, data: &ArrayView2<f64>) -> Result<()> {
        let (n, dim) = data.dim();
        if n == 0 {
            return Err(Error::EmptyData);
        }
        if dim != self.config.dimension {
            return Err(Error::DimensionMismatch {
                index: 0,
                expected: self.config.dimension,
                found: dim,
            });
        }
        if self.config.k > n {
            return Err(Error::TooFewPoints {
                k: self.config.k,
                points: n,
            });
        }
        check_finite(data)
    }

    fn validate_centroids(&self, centroids: &ArrayView2<f64>) -> Result<()> {
        let expected = (self.config.k, self.config.dimension);
        let found = centroids.dim();
        if found != expected {
            return Err(Error::CentroidShape { expected, found });
        }
        check_finite(centroids)
    }
}

fn check_finite(rows: &ArrayView2<f64>) -> Result<()> {
    match rows
        .axis_iter(Axis(0))
        .position(|row| row.iter().any(|v| !v.is_finite()))
    {
        Some(index) => Err(Error::NonFinite { index }),
        None => Ok(()),
    }
}
