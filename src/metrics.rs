//! Interpretability metrics for the clusters of a result

use crate::cluster::Cluster;
use crate::error::{Error, Result};
use crate::selection::ClusteringResult;
use crate::vectors::Attribute;
use std::collections::HashMap;

/// How characteristic one attribute is of one cluster
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeMetric {
    /// Attribute name
    pub attribute: String,
    /// Fraction of the cluster's items carrying the attribute
    pub cohesion: f64,
    /// Fraction of all other clusters' items carrying the attribute
    pub overlap: f64,
}

impl AttributeMetric {
    /// Cohesion as a rounded percentage
    pub fn cohesion_percent(&self) -> u32 {
        (100.0 * self.cohesion).round() as u32
    }

    /// Overlap as a rounded percentage
    pub fn overlap_percent(&self) -> u32 {
        (100.0 * self.overlap).round() as u32
    }
}

/// Cohesion and overlap of each of `top_attributes` for `clusters[index]`.
///
/// Results follow the order of `top_attributes`. Points without a bound item
/// never count as carrying an attribute.
pub fn cluster_metrics<S: AsRef<str>>(
    clusters: &[Cluster],
    index: usize,
    top_attributes: &[S],
) -> Result<Vec<AttributeMetric>> {
    let own = clusters.get(index).ok_or_else(|| {
        Error::invalid_parameter(format!(
            "Cluster index {} out of range for {} clusters",
            index,
            clusters.len()
        ))
    })?;

    let mut cohesions = vec![0usize; top_attributes.len()];
    let mut overlaps = vec![0usize; top_attributes.len()];
    let mut other_items = 0usize;

    for (c, cluster) in clusters.iter().enumerate() {
        if c != index {
            other_items += cluster.len();
        }
        for point in cluster.points() {
            let Some(item) = point.item() else {
                continue;
            };
            for (i, attribute) in top_attributes.iter().enumerate() {
                if item.has_attribute(attribute.as_ref()) {
                    if c == index {
                        cohesions[i] += 1;
                    } else {
                        overlaps[i] += 1;
                    }
                }
            }
        }
    }

    let this_items = own.len();
    if this_items == 0 || other_items == 0 {
        return Err(Error::invalid_data(
            "Metrics need a non-empty cluster and at least one other populated cluster",
        ));
    }

    Ok(top_attributes
        .iter()
        .zip(cohesions.into_iter().zip(overlaps))
        .map(|(attribute, (c, o))| AttributeMetric {
            attribute: attribute.as_ref().to_string(),
            cohesion: c as f64 / this_items as f64,
            overlap: o as f64 / other_items as f64,
        })
        .collect())
}

/// The `n` heaviest attributes of a cluster's representative item.
///
/// Attributes are ranked by descending cluster weight; names missing from
/// `attributes` rank as weight zero. Empty until the cluster is finalized.
pub fn top_attributes(cluster: &Cluster, attributes: &[Attribute], n: usize) -> Vec<String> {
    let Some(item) = cluster.representative().and_then(|p| p.item()) else {
        return Vec::new();
    };

    let weights: HashMap<&str, f64> = attributes
        .iter()
        .map(|a| (a.name.as_str(), a.cluster_weight))
        .collect();
    let weight = |name: &str| weights.get(name).copied().unwrap_or(0.0);

    let mut ranked: Vec<&String> = item.attributes().iter().collect();
    ranked.sort_by(|a, b| weight(b.as_str()).total_cmp(&weight(a.as_str())));
    ranked.into_iter().take(n).cloned().collect()
}

impl ClusteringResult {
    /// Number of clusters in the result
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the result holds no clusters
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Metrics for `clusters[index]`; see [`cluster_metrics`]
    pub fn cluster_metrics<S: AsRef<str>>(
        &self,
        index: usize,
        top_attributes: &[S],
    ) -> Result<Vec<AttributeMetric>> {
        cluster_metrics(&self.clusters, index, top_attributes)
    }

    /// Sort every cluster's members by descending silhouette and compute the
    /// metrics of each cluster's `n` top attributes, as a report shows them.
    pub fn describe(
        &mut self,
        attributes: &[Attribute],
        n: usize,
    ) -> Result<Vec<Vec<AttributeMetric>>> {
        for cluster in &mut self.clusters {
            cluster.sort_by_silhouette();
        }

        (0..self.clusters.len())
            .map(|i| {
                let top = top_attributes(&self.clusters[i], attributes, n);
                cluster_metrics(&self.clusters, i, &top)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::vectors::{Item, WeightingMode};
    use ndarray::arr1;
    use std::sync::Arc;

    fn point(id: u64, x: f64, attrs: &[&str]) -> Point {
        Point::with_item(arr1(&[x]), Arc::new(Item::new(id, vec![attrs.to_vec()])))
    }

    fn sample() -> Vec<Cluster> {
        vec![
            Cluster::new(vec![
                point(1, 0.0, &["a", "b"]),
                point(2, 1.0, &["a"]),
                point(3, 2.0, &["a", "b"]),
                point(4, 5.0, &["a", "c"]),
            ])
            .unwrap(),
            Cluster::new(vec![point(5, 9.0, &["b"]), point(6, 11.0, &["c"])]).unwrap(),
            Cluster::new(vec![point(7, 20.0, &["b", "c"]), point(8, 20.1, &[])]).unwrap(),
        ]
    }

    #[test]
    fn test_cohesion_and_overlap() {
        let metrics = cluster_metrics(&sample(), 0, &["a", "b", "c", "z"]).unwrap();

        assert_eq!(metrics[0].attribute, "a");
        assert_eq!(metrics[0].cohesion, 1.0);
        assert_eq!(metrics[0].overlap, 0.0);

        assert_eq!(metrics[1].cohesion, 0.5);
        assert_eq!(metrics[1].overlap, 0.5);

        assert_eq!(metrics[2].cohesion, 0.25);
        assert_eq!(metrics[2].overlap, 0.5);

        assert_eq!(metrics[3].cohesion, 0.0);
        assert_eq!(metrics[3].overlap, 0.0);
    }

    #[test]
    fn test_percentages() {
        let metric = AttributeMetric {
            attribute: "x".into(),
            cohesion: 2.0 / 3.0,
            overlap: 0.004,
        };
        assert_eq!(metric.cohesion_percent(), 67);
        assert_eq!(metric.overlap_percent(), 0);
    }

    #[test]
    fn test_requires_other_clusters() {
        let clusters = vec![Cluster::new(vec![point(1, 0.0, &["a"])]).unwrap()];
        assert!(cluster_metrics(&clusters, 0, &["a"]).is_err());
        assert!(cluster_metrics(&sample(), 5, &["a"]).is_err());
    }

    #[test]
    fn test_top_attributes_by_weight() {
        let attributes = vec![
            Attribute::new("a", 1, 1, 10, 10, WeightingMode::Count),
            Attribute::new("b", 1, 6, 10, 10, WeightingMode::Count),
            Attribute::new("c", 4, 1, 10, 10, WeightingMode::Count),
        ];
        let mut cluster = Cluster::new(vec![point(1, 0.0, &["a", "b", "c"])]).unwrap();
        assert!(top_attributes(&cluster, &attributes, 5).is_empty());

        cluster.finalize().unwrap();
        assert_eq!(top_attributes(&cluster, &attributes, 5), vec!["b", "c", "a"]);
        assert_eq!(top_attributes(&cluster, &attributes, 1), vec!["b"]);
    }

    #[test]
    fn test_describe_result() {
        let attributes = vec![
            Attribute::new("a", 0, 4, 8, 8, WeightingMode::Count),
            Attribute::new("b", 3, 1, 8, 8, WeightingMode::Count),
            Attribute::new("c", 2, 3, 8, 8, WeightingMode::Count),
        ];
        let mut clusters = sample();
        for cluster in &mut clusters {
            cluster.finalize().unwrap();
        }
        let mut result = ClusteringResult {
            silhouette: 0.5,
            clusters,
            k: 3,
            n_iter: 1,
        };

        let described = result.describe(&attributes, 5).unwrap();
        assert_eq!(described.len(), 3);
        // representative of the first cluster is item 3, sitting on the centroid
        assert_eq!(described[0].len(), 2);
        assert_eq!(described[0][0].attribute, "a");
        assert_eq!(described[0][0].cohesion, 1.0);
        assert_eq!(described[0][1].attribute, "b");
        assert_eq!(described[0][1].cohesion, 0.5);
        assert!(described[2].is_empty() || described[2].iter().all(|m| m.cohesion <= 1.0));
        assert_eq!(result.len(), 3);
    }
}
