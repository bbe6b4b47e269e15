//! Seeding strategies for k-means and the random baseline partition

use crate::cluster::Cluster;
use crate::distance::{Backend, PointDistance};
use crate::error::{Error, Result};
use crate::point::Point;
use rand::prelude::*;

/// How the initial k-means seeds are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedMethod {
    /// The first k points in input order, for reproducible tests
    FirstK,
    /// A random first seed, then repeatedly the point farthest from the
    /// average of the seeds chosen so far
    #[default]
    FarthestPoint,
}

/// Choose `k` seed indices into `points`
pub fn select_seeds<R>(
    points: &[Point],
    k: usize,
    method: SeedMethod,
    backend: Backend,
    rng: &mut R,
) -> Result<Vec<usize>>
where
    R: Rng,
{
    match method {
        SeedMethod::FirstK => first_k(points, k),
        SeedMethod::FarthestPoint => farthest_point(points, k, backend, rng),
    }
}

/// The first `k` points, in input order
pub fn first_k(points: &[Point], k: usize) -> Result<Vec<usize>> {
    if k == 0 {
        return Err(Error::invalid_parameter("Number of clusters must be > 0"));
    }

    if k > points.len() {
        return Err(Error::invalid_parameter(
            "Number of clusters cannot exceed number of points",
        ));
    }

    Ok((0..k).collect())
}

/// Dispersion seeding.
///
/// The first seed is drawn uniformly; the i-th seed is the remaining point
/// farthest from the average of the first i-1 seeds. Distance to the running
/// average is a cheaper stand-in for distance to the nearest seed.
pub fn farthest_point<R>(
    points: &[Point],
    k: usize,
    backend: Backend,
    rng: &mut R,
) -> Result<Vec<usize>>
where
    R: Rng,
{
    if k <= 1 {
        return Err(Error::invalid_parameter(
            "Dispersion seeding needs at least two clusters",
        ));
    }

    if k > points.len() {
        return Err(Error::invalid_parameter(
            "Number of clusters cannot exceed number of points",
        ));
    }

    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let first = remaining.remove(rng.gen_range(0..remaining.len()));
    let mut seeds = vec![first];

    while seeds.len() < k {
        let rows: Vec<_> = seeds.iter().map(|&i| points[i].coords()).collect();
        let average = backend.mean(&rows)?;

        let mut best = 0;
        let mut best_distance = f64::NEG_INFINITY;
        for (pos, &idx) in remaining.iter().enumerate() {
            let dist = backend.distance(average.view(), points[idx].coords())?;
            if dist > best_distance {
                best_distance = dist;
                best = pos;
            }
        }

        seeds.push(remaining.remove(best));
    }

    Ok(seeds)
}

/// Shuffle the points and cut them into `k` finalized clusters.
///
/// Every chunk holds `n / k` points except the last, which also takes the
/// remainder. Not refined further; used as a baseline.
pub fn random_equal_chunks<R>(
    mut points: Vec<Point>,
    k: usize,
    backend: Backend,
    rng: &mut R,
) -> Result<Vec<Cluster>>
where
    R: Rng,
{
    if k == 0 {
        return Err(Error::invalid_parameter("Number of clusters must be > 0"));
    }

    if k > points.len() {
        return Err(Error::invalid_parameter(
            "Number of clusters cannot exceed number of points",
        ));
    }

    points.shuffle(rng);
    let chunk = points.len() / k;

    let mut clusters = Vec::with_capacity(k);
    for i in (0..k).rev() {
        let tail = points.split_off(i * chunk);
        let mut cluster = Cluster::with_backend(tail, backend)?;
        cluster.finalize()?;
        clusters.push(cluster);
    }
    clusters.reverse();

    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn line(coords: &[f64]) -> Vec<Point> {
        coords.iter().map(|&c| Point::new(arr1(&[c]))).collect()
    }

    #[test]
    fn test_first_k() {
        let points = line(&[5.0, 1.0, 3.0]);
        assert_eq!(first_k(&points, 2).unwrap(), vec![0, 1]);
        assert!(first_k(&points, 0).is_err());
        assert!(first_k(&points, 4).is_err());
    }

    #[test]
    fn test_farthest_point_spreads_seeds() {
        let points = line(&[0.0, 1.0, 2.0, 50.0, 100.0]);
        let mut rng = StdRng::seed_from_u64(42);

        for backend in [Backend::Manual, Backend::Vectorized] {
            let seeds = farthest_point(&points, 3, backend, &mut rng).unwrap();
            assert_eq!(seeds.len(), 3);

            let mut unique = seeds.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), 3);

            // Whatever the first seed, one of the extremes follows it
            assert!(seeds[1] == 0 || seeds[1] == 4);
        }
    }

    #[test]
    fn test_farthest_point_second_seed_is_farthest() {
        let points = line(&[0.0, 10.0]);
        let mut rng = StdRng::seed_from_u64(7);
        let seeds = farthest_point(&points, 2, Backend::Manual, &mut rng).unwrap();
        assert_eq!(seeds.len(), 2);
        assert_ne!(seeds[0], seeds[1]);
    }

    #[test]
    fn test_farthest_point_invalid_k() {
        let points = line(&[0.0, 1.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(42);
        assert!(farthest_point(&points, 1, Backend::Manual, &mut rng).is_err());
        assert!(farthest_point(&points, 4, Backend::Manual, &mut rng).is_err());
    }

    #[test]
    fn test_select_seeds_dispatch() {
        let points = line(&[0.0, 1.0, 2.0, 3.0]);
        let mut rng = StdRng::seed_from_u64(42);
        let det = select_seeds(&points, 3, SeedMethod::FirstK, Backend::Manual, &mut rng).unwrap();
        assert_eq!(det, vec![0, 1, 2]);
        let rnd =
            select_seeds(&points, 3, SeedMethod::FarthestPoint, Backend::Manual, &mut rng).unwrap();
        assert_eq!(rnd.len(), 3);
    }

    #[test]
    fn test_random_equal_chunks_sizes() {
        let points = line(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut rng = StdRng::seed_from_u64(42);

        let clusters = random_equal_chunks(points, 3, Backend::Manual, &mut rng).unwrap();
        let sizes: Vec<usize> = clusters.iter().map(Cluster::len).collect();
        assert_eq!(sizes, vec![2, 2, 3]);
        assert!(clusters.iter().all(|c| c.representative().is_some()));
    }

    #[test]
    fn test_random_equal_chunks_invalid_k() {
        let mut rng = StdRng::seed_from_u64(42);
        assert!(random_equal_chunks(line(&[0.0, 1.0]), 3, Backend::Manual, &mut rng).is_err());
        assert!(random_equal_chunks(line(&[0.0, 1.0]), 0, Backend::Manual, &mut rng).is_err());
    }
}
