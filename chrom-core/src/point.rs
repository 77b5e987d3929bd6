use std::{
    fmt::Debug,
    ops::{Add, Div, Mul, Sub},
};

use arrow::datatypes::{ArrowNativeType, DataType, Fields, Schema, SchemaRef};
use num_traits::{Bounded, Float, Num, NumCast, Signed, Zero};
use crate::schema::location_field;

/// Coordinate trait
pub trait Coord
where
    Self: Bounded + Num + NumCast + Signed + PartialOrd + Clone + Copy + Debug + ArrowNativeType,
{
    const DATA_TYPE: DataType;
}

impl Coord for f64 {
    const DATA_TYPE: DataType = DataType::Float64;
}
impl Coord for f32 {
    const DATA_TYPE: DataType = DataType::Float32;
}

/// Point trait
pub trait PointTrait: rstar::Point + rstar::RTreeObject + std::marker::Send + Sync {
    fn data_type() -> DataType;

    fn schema() -> SchemaRef;

    #[inline]
    fn from_slice(components: &[Self::Scalar]) -> Self {
        Self::generate(|i| {
            components
                .get(i)
                .cloned()
                .unwrap_or_else(Self::Scalar::zero)
        })
    }

    fn coords(&self) -> &[Self::Scalar];

    fn x(&self) -> Self::Scalar {
        if Self::DIMENSIONS > 0 {
            self.nth(0)
        } else {
            Self::Scalar::zero()
        }
    }

    fn y(&self) -> Self::Scalar {
        if Self::DIMENSIONS > 1 {
            self.nth(1)
        } else {
            Self::Scalar::zero()
        }
    }

    fn z(&self) -> Self::Scalar {
        if Self::DIMENSIONS > 2 {
            self.nth(2)
        } else {
            Self::Scalar::zero()
        }
    }

    fn add(&self, other: &Self) -> Self {
        Self::generate(|i| self.nth(i).add(other.nth(i)))
    }

    fn sub(&self, other: &Self) -> Self {
        Self::generate(|i| self.nth(i).sub(other.nth(i)))
    }

    fn mul(&self, other: &Self) -> Self {
        Self::generate(|i| self.nth(i).mul(other.nth(i)))
    }

    fn div(&self, other: &Self) -> Self {
        Self::generate(|i| self.nth(i).div(other.nth(i)))
    }

    /// Multiply every component by `factor`
    fn scale(&self, factor: Self::Scalar) -> Self {
        Self::generate(|i| self.nth(i).mul(factor))
    }

    /// Euclidean distance
    fn distance(&self, other: &Self) -> Self::Scalar
    where
        Self::Scalar: Float,
    {
        let d = self.sub(other);
        (0..Self::DIMENSIONS)
            .fold(Self::Scalar::zero(), |acc, i| acc + d.nth(i) * d.nth(i))
            .sqrt()
    }
}

/// Arithmetic mean of a set of points, `None` when empty.
pub fn centroid<P>(points: &[P]) -> Option<P>
where
    P: PointTrait,
    <P as rstar::Point>::Scalar: NumCast,
{
    let (first, rest) = points.split_first()?;
    let sum = rest.iter().fold(first.clone(), |acc, p| acc.add(p));
    let n: P::Scalar = num_traits::cast(points.len())?;
    Some(P::generate(|i| sum.nth(i) / n))
}

/// Weighted mean of a set of points, `None` when empty or the weights sum to zero.
pub fn weighted_centroid<P>(points: &[P], weights: &[P::Scalar]) -> Option<P>
where
    P: PointTrait,
{
    let total = weights
        .iter()
        .take(points.len())
        .fold(P::Scalar::zero(), |acc, w| acc + *w);
    if points.is_empty() || total.is_zero() {
        return None;
    }

    let sum = points
        .iter()
        .zip(weights)
        .fold(P::generate(|_| P::Scalar::zero()), |acc, (p, w)| {
            acc.add(&p.scale(*w))
        });
    Some(P::generate(|i| sum.nth(i) / total))
}

/// Point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<T, const D: usize> {
    location: [T; D],
}

/// Bead and reference point location
pub type Point3 = Point<f64, 3>;

impl<T: Coord, const D: usize> PointTrait for Point<T, D> {
    fn data_type() -> DataType {
        T::DATA_TYPE
    }

    fn schema() -> SchemaRef {
        Schema::new(Fields::from_iter(
            ["x", "y", "z"]
                .into_iter()
                .take(D)
                .enumerate()
                .map(|(i, name)| location_field(name, i + 1, T::DATA_TYPE)),
        ))
        .into()
    }

    fn coords(&self) -> &[T] {
        &self.location
    }
}

impl<T: Coord, const D: usize> rstar::Point for Point<T, D> {
    type Scalar = T;

    const DIMENSIONS: usize = D;

    #[inline]
    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        let mut i = 0;
        let coords = [(); D].map(|_| {
            let res = generator(i);
            i += 1;
            res
        });

        Point { location: coords }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        self.location[index]
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        &mut self.location[index]
    }
}

impl<T, const D: usize> From<[T; D]> for Point<T, D> {
    fn from(location: [T; D]) -> Self {
        Point { location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema() {
        let schema = Point3::schema();
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.field(2).name(), "z");
        assert_eq!(schema.field(0).data_type(), &DataType::Float64);
    }

    #[test]
    fn slice() {
        let p: Point<f64, 2> = Point::from_slice(&[1.; 3]);
        assert_eq!(p, Point::from_slice(&[1.; 2]));

        let p: Point3 = Point::from_slice(&[1.; 2]);
        assert_eq!(p, Point::from([1., 1., 0.]));
    }

    #[test]
    fn ops() {
        let one: Point3 = Point::from_slice(&[1.; 3]);
        let two: Point3 = Point::from_slice(&[2.; 3]);
        let three: Point3 = Point::from_slice(&[3.; 3]);
        let four: Point3 = Point::from_slice(&[4.; 3]);

        assert_eq!(one.add(&one), two);
        assert_eq!(three.sub(&one), two);
        assert_eq!(two.mul(&two), four);
        assert_eq!(four.div(&two), two);
        assert_eq!(one.scale(4.), four);
    }

    #[test]
    fn distance() {
        let a = Point3::from([0., 0., 0.]);
        let b = Point3::from([1., 2., 2.]);

        assert_eq!(a.distance(&b), 3.);
        assert_eq!(b.distance(&b), 0.);
        assert_eq!(b.distance(&a), a.distance(&b));

        let c: Point<f32, 2> = Point::from([3., 0.]);
        let d: Point<f32, 2> = Point::from([0., 4.]);
        assert_eq!(c.distance(&d), 5.);
    }

    #[test]
    fn centroids() {
        let points = [
            Point3::from([0., 0., 0.]),
            Point3::from([2., 0., 0.]),
            Point3::from([1., 3., 0.]),
        ];
        assert_eq!(centroid(&points), Some(Point3::from([1., 1., 0.])));
        assert_eq!(centroid::<Point3>(&[]), None);
        assert_eq!(centroid(&points[..1]), Some(points[0]));

        let weighted = weighted_centroid(&points[..2], &[1., 3.]).unwrap();
        assert_eq!(weighted, Point3::from([1.5, 0., 0.]));
        assert_eq!(weighted_centroid(&points, &[0., 0., 0.]), None);
    }
}
