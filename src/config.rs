//! Options for a clustering pass over one parse-change category

use crate::distance::Backend;
use crate::error::{Error, Result};
use crate::initialization::SeedMethod;
use crate::vectors::WeightingMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Caller configuration for model selection
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusteringOptions {
    /// Largest number of clusters to try
    pub max_k: usize,
    /// Cluster at `max_k` only instead of searching `2..=max_k`
    pub force_k: bool,
    /// How attribute weights in the input vectors were derived
    pub weighting: WeightingMode,
    /// Seeding strategy for each k-means run
    pub seeding: SeedMethod,
    /// Base random seed; trial `k` uses `seed + k`
    pub random_state: Option<u64>,
    /// Upper bound on k-means assignment passes
    pub max_iter: usize,
    /// Run the candidate k values on the rayon pool
    pub parallel: bool,
    /// Numeric backend
    pub backend: Backend,
    /// Report each candidate k through `tracing`
    pub verbose: bool,
}

impl Default for ClusteringOptions {
    fn default() -> Self {
        Self {
            max_k: 6,
            force_k: false,
            weighting: WeightingMode::DeltaIdf,
            seeding: SeedMethod::FarthestPoint,
            random_state: None,
            max_iter: 300,
            parallel: false,
            backend: Backend::Manual,
            verbose: false,
        }
    }
}

impl ClusteringOptions {
    /// Options searching up to `max_k` clusters
    pub fn new(max_k: usize) -> Self {
        Self {
            max_k,
            ..Default::default()
        }
    }

    /// Skip model selection and cluster at `max_k`
    pub fn force_k(mut self, force_k: bool) -> Self {
        self.force_k = force_k;
        self
    }

    /// Record the weighting mode of the input vectors
    pub fn weighting(mut self, weighting: WeightingMode) -> Self {
        self.weighting = weighting;
        self
    }

    /// Set the seeding strategy
    pub fn seeding(mut self, seeding: SeedMethod) -> Self {
        self.seeding = seeding;
        self
    }

    /// Set the random seed for reproducibility
    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Set the maximum number of k-means passes
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Run candidate k values in parallel
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the numeric backend
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Enable verbose diagnostics
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the options before any clustering starts
    pub fn validate(&self) -> Result<()> {
        if self.max_k < 2 {
            return Err(Error::invalid_parameter("max_k must be >= 2"));
        }

        if self.max_iter == 0 {
            return Err(Error::invalid_parameter("max_iter must be > 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClusteringOptions::default();
        assert_eq!(options.max_k, 6);
        assert!(!options.force_k);
        assert_eq!(options.weighting, WeightingMode::DeltaIdf);
        assert_eq!(options.seeding, SeedMethod::FarthestPoint);
        assert!(!options.verbose);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = ClusteringOptions::new(4)
            .force_k(true)
            .weighting(WeightingMode::Count)
            .seeding(SeedMethod::FirstK)
            .random_state(9)
            .max_iter(20)
            .parallel(true)
            .backend(Backend::Vectorized)
            .verbose(true);

        assert_eq!(options.max_k, 4);
        assert!(options.force_k);
        assert_eq!(options.weighting, WeightingMode::Count);
        assert_eq!(options.seeding, SeedMethod::FirstK);
        assert_eq!(options.random_state, Some(9));
        assert_eq!(options.max_iter, 20);
        assert!(options.parallel);
        assert_eq!(options.backend, Backend::Vectorized);
        assert!(options.verbose);
    }

    #[test]
    fn test_validate() {
        assert!(ClusteringOptions::new(1).validate().is_err());
        assert!(ClusteringOptions::new(2).max_iter(0).validate().is_err());
        assert!(ClusteringOptions::new(2).validate().is_ok());
    }
}
