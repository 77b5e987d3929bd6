use num_traits::{Bounded, Zero};
use rstar::Envelope;

use crate::PointTrait;

/// Axis aligned bounding box, wraps [rstar::AABB]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB<P: PointTrait>(rstar::AABB<P>);

impl<P: PointTrait> std::ops::Deref for AABB<P> {
    type Target = rstar::AABB<P>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P> AABB<P>
where
    P: PointTrait,
{
    /// Returns an AABB that contains nothing, lower corner at the scalar maximum.
    pub fn new_empty() -> Self {
        AABB(rstar::AABB::new_empty())
    }

    /// Returns the AABB encompassing a single point.
    pub fn from_point(p: P) -> Self {
        AABB(rstar::AABB::from_point(p))
    }

    /// Returns the AABB's lower corner.
    ///
    /// This is the point contained within the AABB with the smallest coordinate value in each
    /// dimension.
    pub fn lower(&self) -> P {
        self.0.lower()
    }

    /// Returns the AABB's upper corner.
    ///
    /// This is the point contained within the AABB with the largest coordinate value in each
    /// dimension.
    pub fn upper(&self) -> P {
        self.0.upper()
    }

    /// Creates a new AABB encompassing two points.
    pub fn from_corners(p1: P, p2: P) -> Self {
        AABB(rstar::AABB::from_corners(p1, p2))
    }

    /// Creates a new AABB encompassing a collection of points.
    pub fn from_points<'a, I>(i: I) -> Self
    where
        I: IntoIterator<Item = &'a P> + 'a,
        P: 'a,
    {
        i.into_iter()
            .fold(Self::new_empty(), |aabb, p| aabb.add_point(p))
    }

    /// Whether no point was ever added.
    pub fn is_empty(&self) -> bool {
        (0..P::DIMENSIONS).any(|i| self.lower().nth(i) > self.upper().nth(i))
    }

    /// Returns the AABB that contains `self` and another point.
    fn add_point(&self, point: &P) -> Self {
        let lower = self.lower();
        let upper = self.upper();
        AABB(rstar::AABB::from_corners(
            P::generate(|i| {
                if lower.nth(i) < point.nth(i) {
                    lower.nth(i)
                } else {
                    point.nth(i)
                }
            }),
            P::generate(|i| {
                if upper.nth(i) > point.nth(i) {
                    upper.nth(i)
                } else {
                    point.nth(i)
                }
            }),
        ))
    }

    /// Set of all sums `a + b` with `a` in `self` and `b` in `other`.
    ///
    /// Bounds the union of `other` translated onto every point of `self` without visiting
    /// the pairs.
    pub fn minkowski_sum(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::new_empty();
        }
        Self::from_corners(
            self.lower().add(&other.lower()),
            self.upper().add(&other.upper()),
        )
    }

    /// Edge lengths per dimension.
    pub fn extent(&self) -> P {
        if self.is_empty() {
            return P::generate(|_| P::Scalar::zero());
        }
        self.upper().sub(&self.lower())
    }

    /// Largest edge length.
    pub fn max_extent(&self) -> P::Scalar {
        let extent = self.extent();
        (0..P::DIMENSIONS).fold(P::Scalar::zero(), |acc, i| {
            if extent.nth(i) > acc {
                extent.nth(i)
            } else {
                acc
            }
        })
    }

    /// Smallest coordinate value over all dimensions.
    pub fn min_coordinate(&self) -> P::Scalar {
        let lower = self.lower();
        (0..P::DIMENSIONS).fold(P::Scalar::max_value(), |acc, i| {
            if lower.nth(i) < acc {
                lower.nth(i)
            } else {
                acc
            }
        })
    }
}
