//! Squared Euclidean distance, centroid averaging, and the all-pairs table
//!
//! Two numeric backends are provided: plain loops and vectorized `ndarray`
//! arithmetic. They compute the same quantities and are picked once through
//! [`Backend`] in the clustering options.

use crate::error::{Error, Result};
use crate::point::Point;
use crate::vectors::ItemId;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use std::collections::HashMap;

/// Numeric kernel used by the clustering engine
pub trait PointDistance {
    /// Squared Euclidean distance between two coordinate vectors
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64>;

    /// Coordinate-wise mean of a non-empty set of rows of equal length
    fn mean(&self, rows: &[ArrayView1<f64>]) -> Result<Array1<f64>>;

    /// Symmetric matrix of squared distances between the rows of `data`
    fn pairwise(&self, data: ArrayView2<f64>) -> Array2<f64>;
}

/// Loop-based kernel
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualDistance;

impl PointDistance for ManualDistance {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
        if a.len() != b.len() {
            return Err(Error::dimension_mismatch(a.len(), b.len()));
        }

        let sum_sq_diff = a
            .iter()
            .zip(b.iter())
            .filter(|(x, y)| x != y)
            .map(|(x, y)| (x - y).powi(2))
            .sum();

        Ok(sum_sq_diff)
    }

    fn mean(&self, rows: &[ArrayView1<f64>]) -> Result<Array1<f64>> {
        let n_features = check_rows(rows)?;
        let mut totals = vec![0.0; n_features];

        for row in rows {
            for (total, value) in totals.iter_mut().zip(row.iter()) {
                *total += value;
            }
        }

        let count = rows.len() as f64;
        Ok(totals.into_iter().map(|total| total / count).collect())
    }

    fn pairwise(&self, data: ArrayView2<f64>) -> Array2<f64> {
        let n = data.nrows();
        let mut matrix = Array2::zeros((n, n));

        for i in 0..n {
            for j in 0..i {
                let dist = data
                    .row(i)
                    .iter()
                    .zip(data.row(j).iter())
                    .filter(|(x, y)| x != y)
                    .map(|(x, y)| (x - y).powi(2))
                    .sum::<f64>();
                matrix[[i, j]] = dist;
                matrix[[j, i]] = dist;
            }
        }

        matrix
    }
}

/// Vectorized `ndarray` kernel
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorizedDistance;

impl PointDistance for VectorizedDistance {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
        if a.len() != b.len() {
            return Err(Error::dimension_mismatch(a.len(), b.len()));
        }

        let diff = &a - &b;
        Ok(diff.dot(&diff))
    }

    fn mean(&self, rows: &[ArrayView1<f64>]) -> Result<Array1<f64>> {
        check_rows(rows)?;
        let stacked = ndarray::stack(Axis(0), rows)
            .map_err(|e| Error::invalid_data(format!("Cannot stack rows: {e}")))?;

        stacked
            .mean_axis(Axis(0))
            .ok_or_else(|| Error::invalid_data("Cannot average zero rows"))
    }

    fn pairwise(&self, data: ArrayView2<f64>) -> Array2<f64> {
        let n = data.nrows();
        let mut matrix = Array2::zeros((n, n));

        for (i, row) in data.rows().into_iter().enumerate() {
            let diffs = &data - &row;
            let dists = diffs.mapv(|d| d * d).sum_axis(Axis(1));
            matrix.row_mut(i).assign(&dists);
        }

        matrix
    }
}

fn check_rows(rows: &[ArrayView1<f64>]) -> Result<usize> {
    let first = rows
        .first()
        .ok_or_else(|| Error::invalid_data("Cannot average zero rows"))?;
    let n_features = first.len();

    if let Some(row) = rows.iter().find(|row| row.len() != n_features) {
        return Err(Error::dimension_mismatch(n_features, row.len()));
    }

    Ok(n_features)
}

/// Numeric backend selected at configuration time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Backend {
    /// [`ManualDistance`]
    #[default]
    Manual,
    /// [`VectorizedDistance`]
    Vectorized,
}

impl PointDistance for Backend {
    fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
        match self {
            Backend::Manual => ManualDistance.distance(a, b),
            Backend::Vectorized => VectorizedDistance.distance(a, b),
        }
    }

    fn mean(&self, rows: &[ArrayView1<f64>]) -> Result<Array1<f64>> {
        match self {
            Backend::Manual => ManualDistance.mean(rows),
            Backend::Vectorized => VectorizedDistance.mean(rows),
        }
    }

    fn pairwise(&self, data: ArrayView2<f64>) -> Array2<f64> {
        match self {
            Backend::Manual => ManualDistance.pairwise(data),
            Backend::Vectorized => VectorizedDistance.pairwise(data),
        }
    }
}

/// Squared Euclidean distance between two points
pub fn distance(a: &Point, b: &Point) -> Result<f64> {
    ManualDistance.distance(a.coords(), b.coords())
}

/// Average of a non-empty set of points, as a synthetic point
pub fn average_point(points: &[Point], backend: Backend) -> Result<Point> {
    let rows: Vec<_> = points.iter().map(Point::coords).collect();
    Ok(Point::new(backend.mean(&rows)?))
}

/// Squared distances between every unordered pair of bound points.
///
/// Keys are item identifiers; lookups accept either order of a pair.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    distances: HashMap<(ItemId, ItemId), f64>,
}

impl DistanceTable {
    /// Compute the table for `points` with the given backend.
    ///
    /// Every point must be bound to an item, item ids must be unique, and
    /// all points must share one dimensionality.
    pub fn build(points: &[Point], backend: Backend) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::invalid_data(
                "At least two points are needed for a distance table",
            ));
        }

        let ids = points
            .iter()
            .map(|point| {
                point
                    .id()
                    .ok_or_else(|| Error::invalid_data("Synthetic points have no identifier"))
            })
            .collect::<Result<Vec<_>>>()?;

        let n_features = points[0].dim();
        let mut flat = Vec::with_capacity(points.len() * n_features);
        for point in points {
            if point.dim() != n_features {
                return Err(Error::dimension_mismatch(n_features, point.dim()));
            }
            flat.extend(point.coords().iter().copied());
        }
        let data = Array2::from_shape_vec((points.len(), n_features), flat)
            .map_err(|e| Error::invalid_data(format!("Cannot build coordinate matrix: {e}")))?;

        let matrix = backend.pairwise(data.view());
        let mut distances = HashMap::with_capacity(points.len() * (points.len() - 1) / 2);

        for i in 0..ids.len() {
            for j in 0..i {
                if distances.insert(Self::key(ids[i], ids[j]), matrix[[i, j]]).is_some()
                    || ids[i] == ids[j]
                {
                    return Err(Error::invalid_data(format!(
                        "Item id {} appears more than once",
                        ids[i]
                    )));
                }
            }
        }

        Ok(Self { distances })
    }

    /// Distance between the items `a` and `b`
    pub fn get(&self, a: ItemId, b: ItemId) -> Result<f64> {
        if a == b {
            return Ok(0.0);
        }
        self.distances
            .get(&Self::key(a, b))
            .copied()
            .ok_or(Error::MissingDistance { a, b })
    }

    /// Number of stored pairs
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Whether the table holds no pairs
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    fn key(a: ItemId, b: ItemId) -> (ItemId, ItemId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// All-pairs distance table using the loop-based kernel
pub fn all_pairwise_distances(points: &[Point]) -> Result<DistanceTable> {
    DistanceTable::build(points, Backend::Manual)
}
