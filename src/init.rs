//! Initial centroid selection.

use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// Produces the `k` starting centroids of a run.
pub trait Initializer {
    fn initial_centroids(&mut self, data: &ArrayView2<f64>, k: usize) -> Result<Array2<f64>>;
}

/// Picks `k` distinct points uniformly at random.
///
/// The random source lives on the driving thread only.
#[derive(Debug, Clone)]
pub struct RandomSample {
    rng: StdRng,
}

impl RandomSample {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Reproducible sampling from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl Initializer for RandomSample {
    fn initial_centroids(&mut self, data: &ArrayView2<f64>, k: usize) -> Result<Array2<f64>> {
        let n = data.nrows();
        if k > n {
            return Err(Error::TooFewPoints { k, points: n });
        }
        let indices: Vec<usize> = (0..n).choose_multiple(&mut self.rng, k);
        Ok(data.select(Axis(0), &indices))
    }
}

/// Fixed, caller-supplied centroids.
#[derive(Debug, Clone)]
pub struct Provided(pub Array2<f64>);

impl Initializer for Provided {
    fn initial_centroids(&mut self, data: &ArrayView2<f64>, k: usize) -> Result<Array2<f64>> {
        let expected = (k, data.ncols());
        let found = self.0.dim();
        if found != expected {
            return Err(Error::CentroidShape { expected, found });
        }
        Ok(self.0.clone())
    }
}
