use crate::centroid::EmptyClusterPolicy;
use crate::error::{Error, Result};

/// Configurable knobs for a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansConfig {
    /// Number of clusters.
    pub k: usize,
    /// Coordinate count of every point and centroid.
    pub dimension: usize,
    /// The run stops once the summed centroid movement is at most this.
    pub min_change: f64,
    /// Threads used by the worker-pool strategy.
    pub workers: usize,
    /// Iteration cap; reaching it ends the run unconverged.
    pub max_iterations: usize,
    pub empty_cluster: EmptyClusterPolicy,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 8,
            dimension: 2,
            min_change: 1e-9,
            workers: 4,
            max_iterations: 300,
            empty_cluster: EmptyClusterPolicy::default(),
        }
    }
}

impl KMeansConfig {
    pub fn new(k: usize, dimension: usize) -> Self {
        Self {
            k,
            dimension,
            ..Self::default()
        }
    }

    pub fn with_min_change(mut self, min_change: f64) -> Self {
        self.min_change = min_change;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks the parameters that do not depend on the point set.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be greater than zero".into()));
        }
        if self.dimension == 0 {
            return Err(Error::InvalidConfig(
                "dimension must be greater than zero".into(),
            ));
        }
        if !self.min_change.is_finite() || self.min_change < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_change must be a finite non-negative number, got {}",
                self.min_change
            )));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig(
                "workers must be greater than zero".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "max_iterations must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(KMeansConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_parameters() {
        let base = KMeansConfig::new(3, 2);
        let cases = [
            KMeansConfig { k: 0, ..base.clone() },
            KMeansConfig {
                dimension: 0,
                ..base.clone()
            },
            base.clone().with_min_change(-1.0),
            base.clone().with_min_change(f64::NAN),
            base.clone().with_workers(0),
            base.clone().with_max_iterations(0),
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "{config:?} should be rejected"
            );
        }
    }
}
