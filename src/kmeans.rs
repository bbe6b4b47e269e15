//! K-means clustering over attribute vectors

use crate::cluster::Cluster;
use crate::distance::Backend;
use crate::error::{Error, Result};
use crate::initialization::{select_seeds, SeedMethod};
use crate::point::Point;
use crate::utils::{
    assign_points_to_clusters, get_cluster_indices, validate_parameters, validate_points,
};
use rand::prelude::*;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// K-means clustering with exact-convergence stopping
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KMeans {
    /// Number of clusters to seed
    pub n_clusters: usize,
    /// Seeding strategy
    pub seed_method: SeedMethod,
    /// Upper bound on assignment passes
    pub max_iter: usize,
    /// Random seed for reproducibility
    pub random_state: Option<u64>,
    /// Numeric backend
    pub backend: Backend,
    /// Enable verbose diagnostics
    pub verbose: bool,
}

/// Result of one k-means run
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Surviving clusters, each finalized
    pub clusters: Vec<Cluster>,
    /// Number of assignment passes performed
    pub n_iter: usize,
    /// Whether every centroid stopped moving before `max_iter`
    pub converged: bool,
    /// Clusters dropped because they received no points
    pub dropped: usize,
}

impl KMeansResult {
    /// Number of surviving clusters
    pub fn k(&self) -> usize {
        self.clusters.len()
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            n_clusters: 2,
            seed_method: SeedMethod::FarthestPoint,
            max_iter: 300,
            random_state: None,
            backend: Backend::Manual,
            verbose: false,
        }
    }
}

impl KMeans {
    /// Create a new k-means clusterer with specified number of clusters
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    /// Set the seeding strategy
    pub fn seed_method(mut self, method: SeedMethod) -> Self {
        self.seed_method = method;
        self
    }

    /// Set the maximum number of assignment passes
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the random seed for reproducibility
    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
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

    /// Cluster `points`, seeding the generator from `random_state` or entropy
    pub fn fit(&self, points: &[Point]) -> Result<KMeansResult> {
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.fit_with_rng(points, &mut rng)
    }

    /// Cluster `points`, drawing seeding randomness from `rng`.
    ///
    /// A cluster that receives no points is dropped for the rest of the run,
    /// so the result may hold fewer than `n_clusters` clusters.
    pub fn fit_with_rng<R: Rng>(&self, points: &[Point], rng: &mut R) -> Result<KMeansResult> {
        validate_points(points)?;
        validate_parameters(self.n_clusters, self.max_iter, points.len())?;

        let seeds = select_seeds(points, self.n_clusters, self.seed_method, self.backend, rng)?;
        let mut clusters = seeds
            .into_iter()
            .map(|i| Cluster::with_backend(vec![points[i].clone()], self.backend))
            .collect::<Result<Vec<_>>>()?;

        let mut n_iter = 0;
        let mut converged = false;
        let mut dropped = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;

            let assignments = assign_points_to_clusters(points, &clusters, self.backend)?;
            let groups = get_cluster_indices(&assignments, clusters.len());

            let mut moved = false;
            let mut survivors = Vec::with_capacity(clusters.len());
            for (mut cluster, indices) in std::mem::take(&mut clusters).into_iter().zip(groups) {
                if indices.is_empty() {
                    dropped += 1;
                    debug!(
                        k = self.n_clusters - dropped,
                        iteration = n_iter,
                        "Dropped empty cluster"
                    );
                    continue;
                }

                let members = indices.iter().map(|&i| points[i].clone()).collect();
                if cluster.update(members)? != 0.0 {
                    moved = true;
                }
                survivors.push(cluster);
            }
            clusters = survivors;

            if clusters.is_empty() {
                return Err(Error::convergence_failure(format!(
                    "All {} clusters emptied",
                    self.n_clusters
                )));
            }

            if !moved {
                converged = true;
                if self.verbose {
                    info!("K-means converged after {} iterations", n_iter);
                }
                break;
            }
        }

        if !converged {
            debug!(max_iter = self.max_iter, "K-means stopped before convergence");
        }

        for cluster in &mut clusters {
            cluster.finalize()?;
        }

        Ok(KMeansResult {
            clusters,
            n_iter,
            converged,
            dropped,
        })
    }
}

/// Single k-means run at `k` with dispersion seeding.
///
/// Returns the finalized clusters and the number of iterations.
pub fn cluster(points: &[Point], k: usize) -> Result<(Vec<Cluster>, usize)> {
    let result = KMeans::new(k).fit(points)?;
    Ok((result.clusters, result.n_iter))
}
