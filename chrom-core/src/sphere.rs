//! Structured sampling of a solid ball.
//!
//! The sampler works on the unit ball; callers scale the offsets by the sphere radius and
//! translate them onto a bead. Offsets are regenerated on every call to
//! [`SphereSampler::offsets`], nothing proportional to the number of beads is kept.

use std::f64::consts::PI;

use itertools::iproduct;

use crate::{point::Point3, PointTrait, AABB};

/// Default angular subdivisions
pub const DEFAULT_SUBDIVISIONS: usize = 15;

/// Evenly spaced samples over `[start, stop]`, or `[start, stop)` without `endpoint`.
pub fn linspace(start: f64, stop: f64, num: usize, endpoint: bool) -> Vec<f64> {
    let div = if endpoint { num.saturating_sub(1) } else { num };
    if div == 0 {
        return vec![start; num];
    }

    let step = (stop - start) / div as f64;
    let mut samples: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
    if endpoint {
        if let Some(last) = samples.last_mut() {
            *last = stop;
        }
    }
    samples
}

/// Ball sampler over a (radius, polar, azimuth) lattice
#[derive(Debug, Clone)]
pub struct SphereSampler {
    subdivisions: usize,
    radial: Vec<f64>,
    polar: Vec<(f64, f64)>,
    azimuth: Vec<(f64, f64)>,
}

impl Default for SphereSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SUBDIVISIONS)
    }
}

impl SphereSampler {
    /// Sampler with `subdivisions` polar and azimuthal steps and `subdivisions / 2` radial
    /// steps.
    ///
    /// Radii span `[0, 1]` and polar angles `[0, pi]` including both ends, azimuthal angles
    /// span `[0, 2 pi)`.
    pub fn new(subdivisions: usize) -> Self {
        let radial = linspace(0., 1., subdivisions / 2, true);
        let polar = linspace(0., PI, subdivisions, true)
            .into_iter()
            .map(f64::sin_cos)
            .collect();
        let azimuth = linspace(0., 2. * PI, subdivisions, false)
            .into_iter()
            .map(f64::sin_cos)
            .collect();

        SphereSampler {
            subdivisions,
            radial,
            polar,
            azimuth,
        }
    }

    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Number of offsets per ball, duplicates at the center and poles included
    pub fn len(&self) -> usize {
        self.radial.len() * self.polar.len() * self.azimuth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unit ball offsets
    pub fn offsets(&self) -> impl Iterator<Item = Point3> + '_ {
        iproduct!(
            self.azimuth.iter(),
            self.polar.iter(),
            self.radial.iter()
        )
        .map(|(&(sin_t, cos_t), &(sin_p, cos_p), &rho)| {
            Point3::from([rho * sin_p * cos_t, rho * sin_p * sin_t, rho * cos_p])
        })
    }

    /// Ball of `radius` around `center`
    pub fn points_around(&self, center: Point3, radius: f64) -> impl Iterator<Item = Point3> + '_ {
        self.offsets()
            .map(move |offset| center.add(&offset.scale(radius)))
    }

    /// Bounds of the offsets scaled by `radius`
    pub fn bounds(&self, radius: f64) -> AABB<Point3> {
        let offsets: Vec<Point3> = self.offsets().map(|o| o.scale(radius)).collect();
        AABB::from_points(offsets.iter())
    }
}
