//! Points in attribute space

use crate::vectors::{Item, ItemId};
use ndarray::{Array1, ArrayView1};
use std::fmt;
use std::sync::Arc;

/// A point in n-dimensional space, optionally bound to a test item.
///
/// Cloning a point copies its coordinates but shares the bound item, so
/// independent clustering trials can each own their points without
/// duplicating report data.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coords: Array1<f64>,
    item: Option<Arc<Item>>,
    silhouette: Option<f64>,
}

impl Point {
    /// Create a synthetic point with no bound item (e.g. a centroid)
    pub fn new(coords: Array1<f64>) -> Self {
        Self {
            coords,
            item: None,
            silhouette: None,
        }
    }

    /// Create a point bound to `item`
    pub fn with_item(coords: Array1<f64>, item: Arc<Item>) -> Self {
        Self {
            coords,
            item: Some(item),
            silhouette: None,
        }
    }

    /// Coordinates of this point
    pub fn coords(&self) -> ArrayView1<'_, f64> {
        self.coords.view()
    }

    /// Number of dimensions
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// The bound item, if any
    pub fn item(&self) -> Option<&Arc<Item>> {
        self.item.as_ref()
    }

    /// Identifier of the bound item; `None` for synthetic points
    pub fn id(&self) -> Option<ItemId> {
        self.item.as_ref().map(|item| item.id())
    }

    /// Whether this point has no bound item
    pub fn is_synthetic(&self) -> bool {
        self.item.is_none()
    }

    /// Silhouette width, available once the point's clustering was scored
    pub fn silhouette(&self) -> Option<f64> {
        self.silhouette
    }

    pub(crate) fn set_silhouette(&mut self, value: f64) {
        self.silhouette = Some(value);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("synthetic point"),
        }
    }
}
