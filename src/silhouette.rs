//! Silhouette width of a clustering
//!
//! For a point p in cluster C, `a(p)` is the mean distance from p to the other
//! members of C and `b(p)` is the smallest mean distance from p to the members
//! of any other cluster. The silhouette of p is `(b - a) / max(a, b)`, or 0
//! when C is a singleton. Distances come from a precomputed
//! [`DistanceTable`], so scoring many candidate clusterings of the same points
//! never recomputes a pair.

use crate::cluster::Cluster;
use crate::distance::DistanceTable;
use crate::error::{Error, Result};
use crate::vectors::ItemId;

/// Silhouette of a single point from its `a` and `b` means
pub fn silhouette_coefficient(a: f64, b: f64) -> f64 {
    let max_ab = a.max(b);
    if max_ab == 0.0 {
        0.0
    } else {
        (b - a) / max_ab
    }
}

/// Score every point and cluster, returning the mean over all points.
///
/// Stores the width on each point and the per-cluster mean on each cluster.
/// Every point counts equally in the returned average, regardless of the size
/// of its cluster.
pub fn score(clusters: &mut [Cluster], distances: &DistanceTable) -> Result<f64> {
    if clusters.len() < 2 {
        return Err(Error::invalid_data(
            "Silhouette needs at least two clusters",
        ));
    }

    let ids = clusters
        .iter()
        .map(|cluster| {
            cluster
                .points()
                .iter()
                .map(|point| {
                    point
                        .id()
                        .ok_or_else(|| Error::invalid_data("Cannot score a synthetic point"))
                })
                .collect::<Result<Vec<ItemId>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let widths = ids
        .iter()
        .enumerate()
        .map(|(c, members)| {
            members
                .iter()
                .enumerate()
                .map(|(i, &id)| point_silhouette(&ids, c, i, id, distances))
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let mut total = 0.0;
    let mut count = 0usize;
    for (cluster, cluster_widths) in clusters.iter_mut().zip(&widths) {
        for (point, &width) in cluster.points_mut().iter_mut().zip(cluster_widths) {
            point.set_silhouette(width);
        }
        let sum: f64 = cluster_widths.iter().sum();
        cluster.set_silhouette(sum / cluster_widths.len() as f64);
        total += sum;
        count += cluster_widths.len();
    }

    Ok(total / count as f64)
}

fn point_silhouette(
    ids: &[Vec<ItemId>],
    cluster: usize,
    index: usize,
    id: ItemId,
    distances: &DistanceTable,
) -> Result<f64> {
    let own = &ids[cluster];
    if own.len() == 1 {
        return Ok(0.0);
    }

    let mut a_total = 0.0;
    for (j, &other) in own.iter().enumerate() {
        if j != index {
            a_total += distances.get(id, other)?;
        }
    }
    let a = a_total / (own.len() - 1) as f64;

    let mut b = f64::INFINITY;
    for (c, members) in ids.iter().enumerate() {
        if c == cluster || members.is_empty() {
            continue;
        }
        let mut b_total = 0.0;
        for &other in members {
            b_total += distances.get(id, other)?;
        }
        b = b.min(b_total / members.len() as f64);
    }

    Ok(silhouette_coefficient(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::all_pairwise_distances;
    use crate::point::Point;
    use crate::vectors::Item;
    use ndarray::arr1;
    use std::sync::Arc;

    fn bound(id: ItemId, x: f64) -> Point {
        Point::with_item(arr1(&[x]), Arc::new(Item::new(id, vec![vec!["a"]])))
    }

    #[test]
    fn test_silhouette_coefficient() {
        assert_eq!(silhouette_coefficient(0.0, 4.0), 1.0);
        assert_eq!(silhouette_coefficient(4.0, 2.0), -0.5);
        assert_eq!(silhouette_coefficient(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_perfect_separation_scores_one() {
        let points = vec![
            bound(1, 0.0),
            bound(2, 0.0),
            bound(3, 0.0),
            bound(4, 10.0),
            bound(5, 10.0),
            bound(6, 10.0),
        ];
        let table = all_pairwise_distances(&points).unwrap();
        let mut clusters = vec![
            Cluster::new(points[..3].to_vec()).unwrap(),
            Cluster::new(points[3..].to_vec()).unwrap(),
        ];

        let overall = score(&mut clusters, &table).unwrap();
        assert_eq!(overall, 1.0);
        assert_eq!(clusters[0].silhouette(), Some(1.0));
        assert!(clusters[1].points().iter().all(|p| p.silhouette() == Some(1.0)));
    }

    #[test]
    fn test_singleton_scores_zero() {
        let points = vec![bound(1, 0.0), bound(2, 1.0), bound(3, 5.0)];
        let table = all_pairwise_distances(&points).unwrap();
        let mut clusters = vec![
            Cluster::new(points[..2].to_vec()).unwrap(),
            Cluster::new(points[2..].to_vec()).unwrap(),
        ];

        let overall = score(&mut clusters, &table).unwrap();
        assert_eq!(clusters[1].points()[0].silhouette(), Some(0.0));
        assert_eq!(clusters[1].silhouette(), Some(0.0));

        // a = 1; b(0) = 25, b(1) = 16
        let s0 = (25.0 - 1.0) / 25.0;
        let s1 = (16.0 - 1.0) / 16.0;
        assert!((clusters[0].silhouette().unwrap() - (s0 + s1) / 2.0).abs() < 1e-12);
        assert!((overall - (s0 + s1) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_overall_weights_points_not_clusters() {
        let points = vec![
            bound(1, 0.0),
            bound(2, 1.0),
            bound(3, 2.0),
            bound(4, 3.0),
            bound(5, 100.0),
        ];
        let table = all_pairwise_distances(&points).unwrap();
        let mut clusters = vec![
            Cluster::new(points[..4].to_vec()).unwrap(),
            Cluster::new(points[4..].to_vec()).unwrap(),
        ];

        let overall = score(&mut clusters, &table).unwrap();
        let per_point: f64 = clusters[0]
            .points()
            .iter()
            .map(|p| p.silhouette().unwrap())
            .sum();
        assert!((overall - per_point / 5.0).abs() < 1e-12);
        let mean_of_means = (clusters[0].silhouette().unwrap() + 0.0) / 2.0;
        assert!((overall - mean_of_means).abs() > 1e-3);
    }

    #[test]
    fn test_misassigned_point_is_negative() {
        let points = vec![bound(1, 0.0), bound(2, 10.0), bound(3, 9.0), bound(4, 11.0)];
        let table = all_pairwise_distances(&points).unwrap();
        let mut clusters = vec![
            Cluster::new(points[..2].to_vec()).unwrap(),
            Cluster::new(points[2..].to_vec()).unwrap(),
        ];

        score(&mut clusters, &table).unwrap();
        let misplaced = clusters[0].points()[1].silhouette().unwrap();
        assert!(misplaced < 0.0);
        assert!(misplaced >= -1.0);
    }

    #[test]
    fn test_requires_two_clusters() {
        let points = vec![bound(1, 0.0), bound(2, 1.0)];
        let table = all_pairwise_distances(&points).unwrap();
        let mut clusters = vec![Cluster::new(points).unwrap()];
        assert!(score(&mut clusters, &table).is_err());
    }

    #[test]
    fn test_missing_pair_fails() {
        let points = vec![bound(1, 0.0), bound(2, 1.0), bound(3, 5.0)];
        let table = all_pairwise_distances(&points[..2]).unwrap();
        let mut clusters = vec![
            Cluster::new(points[..2].to_vec()).unwrap(),
            Cluster::new(points[2..].to_vec()).unwrap(),
        ];
        assert!(matches!(
            score(&mut clusters, &table),
            Err(Error::MissingDistance { .. })
        ));
    }
}
