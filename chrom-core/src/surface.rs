//! Union-of-spheres surface reconstruction.
//!
//! Every bead is wrapped in a sampled solid ball, the samples are binned into a cubic
//! occupancy grid and occupied voxels that are not enclosed on all 26 sides form the surface.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    chain::bond_lengths,
    grid::{OccupancyGrid, Voxel, VoxelFrame},
    point::Point3,
    sphere::{SphereSampler, DEFAULT_SUBDIVISIONS},
    FeatureError, PointCloudTrait, AABB,
};

/// Sphere radius relative to the largest bond length
pub const RADIUS_FACTOR: f64 = 1.45;

/// Default grid resolution per axis
pub const DEFAULT_RESOLUTION: usize = 50;

/// Upper limit on the grid resolution per axis
pub const MAX_RESOLUTION: usize = 512;

/// Upper limit on the angular subdivisions of the sphere sampler
pub const MAX_SUBDIVISIONS: usize = 128;

/// Largest distance between chain-adjacent beads
pub fn max_gap(beads: &[Point3]) -> Option<f64> {
    bond_lengths(beads).reduce(f64::max)
}

/// Radius of the ball placed on every bead, `RADIUS_FACTOR` times the largest bond length.
pub fn sphere_radius(beads: &[Point3]) -> Result<f64, FeatureError> {
    let gap = max_gap(beads).ok_or(FeatureError::ChainTooShort(beads.len()))?;
    let radius = RADIUS_FACTOR * gap;
    if !(radius > 0.) {
        return Err(FeatureError::NonPositiveRadius(radius));
    }
    Ok(radius)
}

/// Reconstructed outer boundary of a chain
#[derive(Debug, Clone)]
pub struct Surface {
    pub points: Vec<Point3>,
    pub voxels: Vec<Voxel>,
    pub frame: VoxelFrame,
    pub radius: f64,
    /// occupied cells before boundary extraction
    pub occupied: usize,
}

impl PointCloudTrait for Surface {
    type Point = Point3;

    fn points(&self) -> &[Point3] {
        &self.points
    }
}

/// Voxelized union-of-spheres surface builder
#[derive(Debug, Clone)]
pub struct SurfaceReconstructor {
    sampler: SphereSampler,
    resolution: usize,
}

impl Default for SurfaceReconstructor {
    fn default() -> Self {
        SurfaceReconstructor {
            sampler: SphereSampler::new(DEFAULT_SUBDIVISIONS),
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl SurfaceReconstructor {
    pub fn try_new(subdivisions: usize, resolution: usize) -> Result<Self, FeatureError> {
        if subdivisions < 2 {
            return Err(FeatureError::InvalidResolution {
                name: "sphere subdivisions",
                value: subdivisions,
                min: 2,
            });
        }
        if subdivisions > MAX_SUBDIVISIONS {
            return Err(FeatureError::ResolutionTooLarge {
                name: "sphere subdivisions",
                value: subdivisions,
                max: MAX_SUBDIVISIONS,
            });
        }
        if resolution < 1 {
            return Err(FeatureError::InvalidResolution {
                name: "grid resolution",
                value: resolution,
                min: 1,
            });
        }
        if resolution > MAX_RESOLUTION {
            return Err(FeatureError::ResolutionTooLarge {
                name: "grid resolution",
                value: resolution,
                max: MAX_RESOLUTION,
            });
        }

        Ok(SurfaceReconstructor {
            sampler: SphereSampler::new(subdivisions),
            resolution,
        })
    }

    pub fn subdivisions(&self) -> usize {
        self.sampler.subdivisions()
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Surface of the chain with the radius derived from its bond lengths.
    pub fn reconstruct(&self, beads: &[Point3]) -> Result<Surface, FeatureError> {
        let radius = sphere_radius(beads)?;
        tracing::debug!("Sphere radius {radius:.6} for {} beads", beads.len());
        self.reconstruct_with_radius(beads, radius)
    }

    /// Surface of the union of balls of `radius` around all beads.
    pub fn reconstruct_with_radius(
        &self,
        beads: &[Point3],
        radius: f64,
    ) -> Result<Surface, FeatureError> {
        if !(radius > 0.) {
            return Err(FeatureError::NonPositiveRadius(radius));
        }
        if beads.is_empty() || self.sampler.is_empty() {
            return Err(FeatureError::ChainTooShort(beads.len()));
        }

        // bounds of all sphere points without generating them
        let bounds = AABB::from_points(beads).minkowski_sum(&self.sampler.bounds(radius));
        let frame = VoxelFrame::enclosing(&bounds, self.resolution)?;
        tracing::debug!(
            "Voxel grid {}³, bin size {:.6}, offset {:.6}",
            frame.resolution,
            frame.bin_size,
            frame.offset
        );

        let grid = OccupancyGrid::new(self.resolution);
        let dropped: usize = beads
            .par_iter()
            .map(|bead| {
                let mut dropped = 0usize;
                for p in self.sampler.points_around(*bead, radius) {
                    match frame.voxel(&p) {
                        Some(voxel) => grid.mark(voxel),
                        None => dropped += 1,
                    }
                }
                dropped
            })
            .sum();

        if dropped > 0 {
            tracing::debug!(
                "Dropped {dropped} of {} sphere points outside the grid",
                beads.len() * self.sampler.len()
            );
        }

        let occupied = grid.count();
        let voxels = grid.surface_voxels();
        if voxels.is_empty() {
            tracing::warn!("No surface voxels among {occupied} occupied cells");
            return Err(FeatureError::DegenerateSurface {
                occupied,
                cells: grid.len(),
            });
        }
        tracing::debug!(
            "Extracted {} surface voxels of {occupied} occupied",
            voxels.len()
        );

        let points = voxels.iter().map(|voxel| frame.world(*voxel)).collect();

        Ok(Surface {
            points,
            voxels,
            frame,
            radius,
            occupied,
        })
    }
}
