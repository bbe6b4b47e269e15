//! Utility functions shared by the k-means core and the model selector

use crate::cluster::Cluster;
use crate::distance::{Backend, PointDistance};
use crate::error::{Error, Result};
use crate::point::Point;

/// Find the cluster whose centroid is closest to `point`.
///
/// Only a strictly smaller distance displaces the current best, so the
/// earliest of several equidistant clusters wins.
pub fn find_closest_centroid(point: &Point, clusters: &[Cluster], backend: Backend) -> Result<usize> {
    if clusters.is_empty() {
        return Err(Error::invalid_data("No centroids provided"));
    }

    let mut min_distance = f64::INFINITY;
    let mut closest_centroid = 0;

    for (i, cluster) in clusters.iter().enumerate() {
        let distance = backend.distance(point.coords(), cluster.centroid().coords())?;
        if distance < min_distance {
            min_distance = distance;
            closest_centroid = i;
        }
    }

    Ok(closest_centroid)
}

/// Assign all points to their closest cluster
pub fn assign_points_to_clusters(
    points: &[Point],
    clusters: &[Cluster],
    backend: Backend,
) -> Result<Vec<usize>> {
    points
        .iter()
        .map(|point| find_closest_centroid(point, clusters, backend))
        .collect()
}

/// Group point indices by assigned cluster
pub fn get_cluster_indices(assignments: &[usize], n_clusters: usize) -> Vec<Vec<usize>> {
    let mut cluster_indices = vec![Vec::new(); n_clusters];

    for (point_idx, &cluster_id) in assignments.iter().enumerate() {
        if cluster_id < n_clusters {
            cluster_indices[cluster_id].push(point_idx);
        }
    }

    cluster_indices
}

/// Validate the points of one clustering run
pub fn validate_points(points: &[Point]) -> Result<()> {
    if points.len() < 2 {
        return Err(Error::invalid_data("At least two points are needed for clustering"));
    }

    let n_features = points[0].dim();
    if let Some(point) = points.iter().find(|p| p.dim() != n_features) {
        return Err(Error::dimension_mismatch(n_features, point.dim()));
    }

    Ok(())
}

/// Validate k-means parameters against the population size
pub fn validate_parameters(n_clusters: usize, max_iter: usize, n_points: usize) -> Result<()> {
    if n_clusters == 0 {
        return Err(Error::invalid_parameter("n_clusters must be > 0"));
    }

    if max_iter == 0 {
        return Err(Error::invalid_parameter("max_iter must be > 0"));
    }

    if n_clusters > n_points {
        return Err(Error::invalid_parameter(
            "Number of clusters cannot exceed number of points",
        ));
    }

    Ok(())
}

/// Shrink the requested maximum k so every cluster can be populated.
///
/// A population no larger than `max_k` caps it at `population - 1`, except
/// that two points still get `k = 2`.
pub fn adjust_max_k(max_k: usize, population: usize) -> usize {
    if population > max_k {
        max_k
    } else if population == 2 {
        2
    } else {
        population - 1
    }
}
