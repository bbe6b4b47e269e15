//! # Attribute-vector clustering for grammar comparisons
//!
//! When two versions of a grammar parse a test suite differently, the items
//! whose parses changed can be grouped by the attributes (rules, types) that
//! changed with them. This crate clusters such items with k-means over
//! weighted attribute vectors, picks the number of clusters by silhouette
//! width, and reports how characteristic each cluster's top attributes are.
//!
//! ## Features
//!
//! - **K-means** with exact-convergence stopping and empty-cluster dropping
//! - Deterministic, dispersion, and random-partition seeding
//! - **Silhouette** scoring from a precomputed all-pairs distance table
//! - Best-of-range **model selection**, optionally in parallel via Rayon
//! - Cohesion/overlap **metrics** for report rendering
//! - Loop-based and vectorized `ndarray` numeric backends
//!
//! ## Example
//!
//! ```rust
//! use gdelta_cluster::{build_points, Attribute, ClusteringOptions, Item, ModelSelector, WeightingMode};
//! use std::sync::Arc;
//!
//! let attributes = vec![
//!     Attribute::new("hd-cmp", 2, 9, 20, 20, WeightingMode::Count),
//!     Attribute::new("n_-_pn", 7, 1, 20, 20, WeightingMode::Count),
//! ];
//! let items: Vec<Arc<Item>> = (0..6)
//!     .map(|id| {
//!         let attr = if id < 3 { "hd-cmp" } else { "n_-_pn" };
//!         Arc::new(Item::new(id, vec![vec![attr]]))
//!     })
//!     .collect();
//!
//! let points = build_points(&attributes, &items);
//! let selector = ModelSelector::new(ClusteringOptions::new(4).random_state(42));
//! let result = selector.select(&points).unwrap().expect("six items can be clustered");
//!
//! assert_eq!(result.clusters.len(), 2);
//! assert_eq!(result.silhouette, 1.0);
//! ```

#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cluster;
pub mod config;
pub mod distance;
pub mod error;
pub mod initialization;
pub mod kmeans;
pub mod metrics;
pub mod point;
pub mod selection;
pub mod silhouette;
pub mod utils;
pub mod vectors;

pub use cluster::Cluster;
pub use config::ClusteringOptions;
pub use distance::{
    all_pairwise_distances, distance, Backend, DistanceTable, ManualDistance, PointDistance,
    VectorizedDistance,
};
pub use error::{Error, Result};
pub use initialization::{farthest_point, first_k, random_equal_chunks, SeedMethod};
pub use kmeans::{cluster, KMeans, KMeansResult};
pub use metrics::{cluster_metrics, top_attributes, AttributeMetric};
pub use point::Point;
pub use selection::{select_best, ClusteringResult, ModelSelector};
pub use vectors::{build_points, Attribute, Item, ItemId, WeightingMode};

/// Re-export commonly used types from ndarray
pub use ndarray::{Array1, ArrayView1};
