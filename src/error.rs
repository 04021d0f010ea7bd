use thiserror::Error;

/// Error type used by operations in this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("point set is empty")]
    EmptyData,
    #[error("cannot build {k} clusters from {points} points")]
    TooFewPoints { k: usize, points: usize },
    #[error("point {index} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("centroid set has shape {found:?}, expected {expected:?}")]
    CentroidShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("run was cancelled")]
    Cancelled,
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),
}

/// Convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;
