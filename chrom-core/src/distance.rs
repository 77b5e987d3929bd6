use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rstar::{RStarInsertionStrategy, RTree, RTreeParams};

use crate::{point::Point3, FeatureError, PointTrait};

/// Reference sets beads are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    CenterOfMass,
    SmoothedPath,
    Surface,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::CenterOfMass => write!(f, "center of mass"),
            ReferenceKind::SmoothedPath => write!(f, "smoothed path"),
            ReferenceKind::Surface => write!(f, "surface"),
        }
    }
}

pub struct ReferenceParams;

impl RTreeParams for ReferenceParams {
    const MIN_SIZE: usize = 4;
    const MAX_SIZE: usize = 16;
    const REINSERTION_COUNT: usize = 2;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

/// Read-only point set answering nearest neighbour distances
pub struct ReferenceSet {
    kind: ReferenceKind,
    index: RTree<Point3, ReferenceParams>,
}

impl ReferenceSet {
    pub fn try_new(kind: ReferenceKind, points: Vec<Point3>) -> Result<Self, FeatureError> {
        if points.is_empty() {
            return Err(FeatureError::EmptyReferenceSet(kind));
        }

        Ok(ReferenceSet {
            kind,
            index: RTree::bulk_load_with_params(points),
        })
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    /// Euclidean distance from `point` to the closest reference point.
    pub fn nearest_distance(&self, point: &Point3) -> f64 {
        self.index
            .nearest_neighbor(point)
            .map_or(f64::INFINITY, |nearest| nearest.distance(point))
    }

    /// Nearest distance for every bead, in bead order.
    pub fn distances(&self, beads: &[Point3]) -> Vec<f64> {
        beads
            .par_iter()
            .map(|bead| self.nearest_distance(bead))
            .collect()
    }
}

fn nearest_distances(
    kind: ReferenceKind,
    beads: &[Point3],
    reference: &[Point3],
) -> Result<Vec<f64>, FeatureError> {
    let set = ReferenceSet::try_new(kind, reference.to_vec())?;
    tracing::debug!("Measuring {} beads against {} {kind} points", beads.len(), set.len());
    Ok(set.distances(beads))
}

/// Distance of every bead to the closest center of mass (one per frame).
pub fn center_distances(beads: &[Point3], centers: &[Point3]) -> Result<Vec<f64>, FeatureError> {
    nearest_distances(ReferenceKind::CenterOfMass, beads, centers)
}

/// Distance of every bead to the closest smoothed path point.
pub fn path_distances(beads: &[Point3], path: &[Point3]) -> Result<Vec<f64>, FeatureError> {
    nearest_distances(ReferenceKind::SmoothedPath, beads, path)
}

/// Distance of every bead to the closest surface point.
pub fn surface_distances(beads: &[Point3], surface: &[Point3]) -> Result<Vec<f64>, FeatureError> {
    nearest_distances(ReferenceKind::Surface, beads, surface)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use rstar::Point as _;

    use super::*;

    fn cloud(n: usize, seed: u64) -> Vec<Point3> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..n)
            .map(|_| Point3::generate(|_| rng.gen_range(-10.0..10.0)))
            .collect()
    }

    #[test]
    fn matches_brute_force() {
        let beads = cloud(200, 1);
        let reference = cloud(500, 2);

        // all pairs distance matrix, beads along rows
        let dm = nalgebra::DMatrix::from_fn(beads.len(), reference.len(), |i, j| {
            beads[i].distance(&reference[j])
        });
        let expected: Vec<f64> = dm.row_iter().map(|row| row.min()).collect();

        let distances = surface_distances(&beads, &reference).unwrap();

        assert_eq!(distances.len(), beads.len());
        for (d, e) in distances.iter().zip(expected) {
            assert!((d - e).abs() < 1e-12);
        }
    }

    #[test]
    fn center_of_middle_bead() {
        let beads = [
            Point3::from([0., 0., 0.]),
            Point3::from([1., 0., 0.]),
            Point3::from([2., 0., 0.]),
        ];

        let distances = center_distances(&beads, &[Point3::from([1., 0., 0.])]).unwrap();
        assert_eq!(distances, vec![1., 0., 1.]);
    }

    #[test]
    fn closest_frame_wins() {
        let beads = [Point3::from([0., 0., 0.]), Point3::from([10., 0., 0.])];
        let centers = [Point3::from([1., 0., 0.]), Point3::from([10., 2., 0.])];

        assert_eq!(center_distances(&beads, &centers).unwrap(), vec![1., 2.]);
    }

    #[test]
    fn empty_reference() {
        let beads = cloud(3, 3);

        assert!(matches!(
            path_distances(&beads, &[]),
            Err(FeatureError::EmptyReferenceSet(ReferenceKind::SmoothedPath))
        ));
        assert!(matches!(
            center_distances(&beads, &[]),
            Err(FeatureError::EmptyReferenceSet(ReferenceKind::CenterOfMass))
        ));
    }

    #[test]
    fn non_negative() {
        let beads = cloud(100, 4);
        let set = ReferenceSet::try_new(ReferenceKind::Surface, cloud(50, 5)).unwrap();

        assert_eq!(set.len(), 50);
        assert!(set.distances(&beads).iter().all(|d| *d >= 0.));
    }
}
