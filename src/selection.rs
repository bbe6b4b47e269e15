//! Choosing the number of clusters by silhouette width

use crate::cluster::Cluster;
use crate::config::ClusteringOptions;
use crate::distance::DistanceTable;
use crate::error::Result;
use crate::initialization::random_equal_chunks;
use crate::kmeans::KMeans;
use crate::point::Point;
use crate::silhouette;
use crate::utils::{adjust_max_k, validate_points};
use rand::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

/// The clustering chosen by model selection
#[derive(Debug, Clone)]
pub struct ClusteringResult {
    /// Average silhouette width over all points
    pub silhouette: f64,
    /// Finalized, scored clusters
    pub clusters: Vec<Cluster>,
    /// The k this clustering was seeded with
    pub k: usize,
    /// K-means passes the winning run took
    pub n_iter: usize,
}

/// Runs k-means over candidate cluster counts and keeps the best one
#[derive(Debug, Clone, Default)]
pub struct ModelSelector {
    options: ClusteringOptions,
}

impl ModelSelector {
    /// Create a selector with the given options
    pub fn new(options: ClusteringOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &ClusteringOptions {
        &self.options
    }

    /// Cluster `points`, either at the forced k or at the k with the best
    /// silhouette in `2..=max_k`.
    ///
    /// Returns `Ok(None)` when clustering is not possible: fewer than two
    /// points, or no candidate k produced at least two clusters.
    pub fn select(&self, points: &[Point]) -> Result<Option<ClusteringResult>> {
        self.options.validate()?;

        if points.len() < 2 {
            if self.options.verbose {
                info!(points = points.len(), "Too few items to cluster");
            }
            return Ok(None);
        }
        validate_points(points)?;

        let k = adjust_max_k(self.options.max_k, points.len());
        if self.options.verbose {
            info!("Clustering {} items", points.len());
            if k != self.options.max_k {
                info!("Max k changed to {}", k);
            }
            info!("Calculating distances between points...");
        }
        let distances = DistanceTable::build(points, self.options.backend)?;

        let best = if self.options.force_k {
            self.trial(points, k, &distances)?
        } else {
            let trials: Vec<Result<Option<ClusteringResult>>> = if self.options.parallel {
                (2..=k)
                    .into_par_iter()
                    .map(|this_k| self.trial(points, this_k, &distances))
                    .collect()
            } else {
                (2..=k)
                    .map(|this_k| self.trial(points, this_k, &distances))
                    .collect()
            };

            // Ascending k, strictly greater replaces: ties keep the smaller k
            let mut best: Option<ClusteringResult> = None;
            for trial in trials {
                if let Some(candidate) = trial? {
                    if best
                        .as_ref()
                        .map_or(true, |b| candidate.silhouette > b.silhouette)
                    {
                        best = Some(candidate);
                    }
                }
            }
            best
        };

        if self.options.verbose {
            match &best {
                Some(result) => {
                    info!("Best k = {}", result.k);
                    info!("Found {} clusters", result.clusters.len());
                }
                None => info!("Clustering not possible"),
            }
        }

        Ok(best)
    }

    /// One k-means run at `k`, scored against `distances`.
    ///
    /// The run's clusters own copies of the coordinates; bound items stay
    /// shared with `points`.
    fn trial(
        &self,
        points: &[Point],
        k: usize,
        distances: &DistanceTable,
    ) -> Result<Option<ClusteringResult>> {
        let mut kmeans = KMeans::new(k)
            .seed_method(self.options.seeding)
            .max_iter(self.options.max_iter)
            .backend(self.options.backend)
            .verbose(self.options.verbose);
        if let Some(seed) = self.options.random_state {
            kmeans = kmeans.random_state(seed.wrapping_add(k as u64));
        }

        let run = match kmeans.fit(points) {
            Ok(run) => run,
            Err(e) if e.is_collapse() => {
                debug!(k, error = %e, "No valid clustering");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if run.k() < 2 {
            debug!(k, "Clustering collapsed to a single cluster");
            return Ok(None);
        }

        let n_iter = run.n_iter;
        let mut clusters = run.clusters;
        let score = silhouette::score(&mut clusters, distances)?;

        if self.options.verbose {
            info!(
                "k = {}, silhouette of {:.3}, with {} iteration(s)",
                k, score, n_iter
            );
        }

        Ok(Some(ClusteringResult {
            silhouette: score,
            clusters,
            k,
            n_iter,
        }))
    }

    /// Score a random, unrefined partition of `points` into `k` clusters.
    ///
    /// Useful as a floor to compare the selected clustering against.
    pub fn random_baseline(&self, points: &[Point], k: usize) -> Result<Option<ClusteringResult>> {
        if points.len() < 2 {
            return Ok(None);
        }
        validate_points(points)?;

        let k = adjust_max_k(k, points.len());
        let distances = DistanceTable::build(points, self.options.backend)?;
        let mut rng = match self.options.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut clusters = random_equal_chunks(points.to_vec(), k, self.options.backend, &mut rng)?;
        let score = silhouette::score(&mut clusters, &distances)?;

        Ok(Some(ClusteringResult {
            silhouette: score,
            clusters,
            k,
            n_iter: 0,
        }))
    }
}

/// Select the best clustering of `points` with up to `k_max` clusters, or
/// exactly `k_max` when `forced`.
pub fn select_best(points: &[Point], k_max: usize, forced: bool) -> Result<Option<ClusteringResult>> {
    ModelSelector::new(ClusteringOptions::new(k_max).force_k(forced)).select(points)
}
