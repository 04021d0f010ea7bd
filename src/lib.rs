//! Parallel k-means clustering (Lloyd's algorithm).
//!
//! Points are the rows of an `ndarray` matrix. A run is configured with
//! [`KMeansConfig`], seeded by an [`Initializer`] and executed either on the
//! calling thread ([`Sequential`]) or on a fixed pool of worker threads
//! ([`WorkerPool`]). Both strategies produce identical memberships for the
//! same starting centroids.
//!
//! ```no_run
//! use ndarray::array;
//! use pkmeans::{KMeans, KMeansConfig, RandomSample};
//!
//! let data = array![[0.0, 0.0], [0.0, 1.0], [10.0, 10.0], [10.0, 11.0]];
//! let config = KMeansConfig::new(2, 2).with_workers(2);
//! let kmeans = KMeans::parallel(config)?;
//! let result = kmeans.fit(&data.view(), &mut RandomSample::seeded(42))?;
//! assert_eq!(result.sizes().iter().sum::<usize>(), 4);
//! # Ok::<(), pkmeans::Error>(())
//! ```

pub mod centroid;
pub mod cluster;
pub mod config;
pub mod error;
pub mod execution;
pub mod geometry;
pub mod init;
pub mod kmeans;

pub use centroid::EmptyClusterPolicy;
pub use cluster::{points_from_rows, Cluster};
pub use config::KMeansConfig;
pub use error::{Error, Result};
pub use execution::{Execution, Sequential, WorkerPool};
pub use init::{Initializer, Provided, RandomSample};
pub use kmeans::{Clustering, IterationStats, KMeans, Step};
