use crate::{point::Point3, PointCloudTrait, PointTrait};

/// Distances between chain-adjacent beads
pub fn bond_lengths(beads: &[Point3]) -> impl Iterator<Item = f64> + '_ {
    beads.windows(2).map(|pair| pair[0].distance(&pair[1]))
}

/// Folded chain as handed over by a structure loader.
///
/// Beads keep their chain order; `centers` holds one center of mass per structural frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    beads: Vec<Point3>,
    centers: Vec<Point3>,
}

impl Chain {
    pub fn new(beads: Vec<Point3>, centers: Vec<Point3>) -> Self {
        Chain { beads, centers }
    }

    pub fn beads(&self) -> &[Point3] {
        &self.beads
    }

    pub fn centers(&self) -> &[Point3] {
        &self.centers
    }
}

impl PointCloudTrait for Chain {
    type Point = Point3;

    fn points(&self) -> &[Point3] {
        &self.beads
    }
}
