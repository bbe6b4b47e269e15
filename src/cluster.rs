//! Clusters of points and their centroids

use crate::distance::{average_point, Backend, PointDistance};
use crate::error::{Error, Result};
use crate::point::Point;

/// A non-empty group of points with a derived centroid
#[derive(Debug, Clone)]
pub struct Cluster {
    points: Vec<Point>,
    centroid: Point,
    backend: Backend,
    representative: Option<usize>,
    silhouette: Option<f64>,
}

impl Cluster {
    /// Create a cluster from at least one point
    pub fn new(points: Vec<Point>) -> Result<Self> {
        Self::with_backend(points, Backend::default())
    }

    /// Create a cluster whose centroid is computed with `backend`
    pub fn with_backend(points: Vec<Point>, backend: Backend) -> Result<Self> {
        let centroid = Self::calculate_centroid(&points, backend)?;
        Ok(Self {
            points,
            centroid,
            backend,
            representative: None,
            silhouette: None,
        })
    }

    /// Replace the members and return how far the centroid moved.
    ///
    /// Clears any finalization state, since it described the old members.
    pub fn update(&mut self, points: Vec<Point>) -> Result<f64> {
        let centroid = Self::calculate_centroid(&points, self.backend)?;
        let shift = self.backend.distance(self.centroid.coords(), centroid.coords())?;

        self.points = points;
        self.centroid = centroid;
        self.representative = None;
        self.silhouette = None;

        Ok(shift)
    }

    fn calculate_centroid(points: &[Point], backend: Backend) -> Result<Point> {
        let first = points.first().ok_or(Error::EmptyCluster)?;
        if let Some(point) = points.iter().find(|p| p.dim() != first.dim()) {
            return Err(Error::dimension_mismatch(first.dim(), point.dim()));
        }
        average_point(points, backend)
    }

    /// Pick the member nearest to the centroid as representative.
    ///
    /// The first of several equally near members wins.
    pub fn finalize(&mut self) -> Result<()> {
        let mut nearest = 0;
        let mut min_distance = f64::INFINITY;

        for (i, point) in self.points.iter().enumerate() {
            let distance = self.backend.distance(self.centroid.coords(), point.coords())?;
            if distance < min_distance {
                min_distance = distance;
                nearest = i;
            }
        }

        self.representative = Some(nearest);
        Ok(())
    }

    /// Members of this cluster
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// Mean of the members
    pub fn centroid(&self) -> &Point {
        &self.centroid
    }

    /// Member nearest to the centroid, once finalized
    pub fn representative(&self) -> Option<&Point> {
        self.representative.map(|i| &self.points[i])
    }

    /// Mean silhouette of the members, once scored
    pub fn silhouette(&self) -> Option<f64> {
        self.silhouette
    }

    pub(crate) fn set_silhouette(&mut self, value: f64) {
        self.silhouette = Some(value);
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the cluster has no members
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Order members by descending silhouette for display.
    ///
    /// Unscored members sort last. The representative keeps pointing at the
    /// same point.
    pub fn sort_by_silhouette(&mut self) {
        let representative = self.representative.map(|i| self.points[i].clone());
        self.points.sort_by(|a, b| {
            let a = a.silhouette().unwrap_or(f64::NEG_INFINITY);
            let b = b.silhouette().unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
        if let Some(rep) = representative {
            self.representative = self.points.iter().position(|p| *p == rep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn synth(coords: &[f64]) -> Point {
        Point::new(arr1(coords))
    }

    #[test]
    fn test_empty_cluster_rejected() {
        assert_eq!(Cluster::new(Vec::new()).unwrap_err(), Error::EmptyCluster);
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let result = Cluster::new(vec![synth(&[1.0]), synth(&[1.0, 2.0])]);
        assert_eq!(result.unwrap_err(), Error::dimension_mismatch(1, 2));
    }

    #[test]
    fn test_centroid_is_mean() {
        for backend in [Backend::Manual, Backend::Vectorized] {
            let cluster = Cluster::with_backend(
                vec![synth(&[0.0, 0.0]), synth(&[2.0, 4.0]), synth(&[4.0, 2.0])],
                backend,
            )
            .unwrap();
            assert_eq!(cluster.centroid().coords(), arr1(&[2.0, 2.0]).view());
            assert!(cluster.centroid().is_synthetic());
            assert_eq!(cluster.len(), 3);
        }
    }

    #[test]
    fn test_update_returns_shift() {
        let mut cluster = Cluster::new(vec![synth(&[0.0])]).unwrap();
        let shift = cluster.update(vec![synth(&[2.0]), synth(&[4.0])]).unwrap();
        assert_eq!(shift, 9.0);
        assert_eq!(cluster.centroid().coords(), arr1(&[3.0]).view());
    }

    #[test]
    fn test_update_same_members_is_idempotent() {
        let members = vec![synth(&[1.0, 5.0]), synth(&[3.0, 1.0])];
        let mut cluster = Cluster::new(members.clone()).unwrap();
        let before = cluster.centroid().clone();

        assert_eq!(cluster.update(members).unwrap(), 0.0);
        assert_eq!(cluster.centroid(), &before);
    }

    #[test]
    fn test_update_with_nothing_fails() {
        let mut cluster = Cluster::new(vec![synth(&[1.0])]).unwrap();
        assert_eq!(cluster.update(Vec::new()).unwrap_err(), Error::EmptyCluster);
        assert_eq!(cluster.len(), 1);
    }

    #[test]
    fn test_finalize_picks_nearest_first() {
        let mut cluster = Cluster::new(vec![
            synth(&[0.0]),
            synth(&[4.0]),
            synth(&[6.0]),
            synth(&[2.0]),
            synth(&[8.0]),
        ])
        .unwrap();
        assert!(cluster.representative().is_none());

        cluster.finalize().unwrap();
        // centroid 4.0
        assert_eq!(cluster.representative().unwrap().coords()[0], 4.0);

        let mut tied = Cluster::new(vec![synth(&[1.0]), synth(&[3.0])]).unwrap();
        tied.finalize().unwrap();
        assert_eq!(tied.representative().unwrap().coords()[0], 1.0);
    }

    #[test]
    fn test_sort_by_silhouette_keeps_representative() {
        let mut a = synth(&[0.0]);
        a.set_silhouette(0.1);
        let mut b = synth(&[1.0]);
        b.set_silhouette(0.9);
        let c = synth(&[2.0]);

        let mut cluster = Cluster::new(vec![a, b, c]).unwrap();
        cluster.finalize().unwrap();
        cluster.sort_by_silhouette();

        let order: Vec<f64> = cluster.points().iter().map(|p| p.coords()[0]).collect();
        assert_eq!(order, vec![1.0, 0.0, 2.0]);
        assert_eq!(cluster.representative().unwrap().coords()[0], 1.0);
    }
}
