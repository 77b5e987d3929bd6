use std::sync::atomic::{AtomicBool, Ordering};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rstar::Point as _;

use crate::{point::Point3, FeatureError, PointTrait, AABB};

/// Occupied neighbours of a fully enclosed voxel
pub const NEIGHBOURHOOD: usize = 26;

/// Positive shift applied to all coordinates, relative to the smallest coordinate value
pub const OFFSET_FACTOR: f64 = 1.25;

/// Relative margin added to the largest extent when sizing the grid
pub const GRID_MARGIN: f64 = 0.1;

/// Voxel index per axis
pub type Voxel = [usize; 3];

/// Placement of a cubic grid in world coordinates.
///
/// World coordinates are shifted by `offset` on every axis and binned with `bin_size`; the
/// shift is the same on all axes so the inverse mapping stays a single affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelFrame {
    pub offset: f64,
    pub bin_size: f64,
    pub resolution: usize,
}

impl VoxelFrame {
    /// Frame covering `bounds` with `resolution` bins along the largest extent.
    pub fn enclosing(bounds: &AABB<Point3>, resolution: usize) -> Result<Self, FeatureError> {
        if resolution == 0 {
            return Err(FeatureError::InvalidResolution {
                name: "grid resolution",
                value: resolution,
                min: 1,
            });
        }

        let offset = bounds.min_coordinate().abs() * OFFSET_FACTOR;
        let edge = bounds.max_extent() * (1. + GRID_MARGIN);
        let bin_size = edge / resolution as f64;

        if !(bin_size.is_finite() && bin_size > 0.) {
            return Err(FeatureError::DegenerateGrid {
                extent: bounds.max_extent(),
            });
        }

        Ok(VoxelFrame {
            offset,
            bin_size,
            resolution,
        })
    }

    /// Voxel containing `point`, `None` outside the grid.
    #[inline]
    pub fn voxel(&self, point: &Point3) -> Option<Voxel> {
        let mut voxel = [0; 3];
        for (axis, c) in point.coords().iter().enumerate() {
            let bin = ((c + self.offset) / self.bin_size).floor();
            // NaN fails both comparisons
            if !(bin >= 0. && bin < self.resolution as f64) {
                return None;
            }
            voxel[axis] = bin as usize;
        }
        Some(voxel)
    }

    /// World coordinate of the lower corner of `voxel`.
    pub fn world(&self, voxel: Voxel) -> Point3 {
        Point3::generate(|i| voxel[i] as f64 * self.bin_size - self.offset)
    }

    /// World coordinate of the midpoint of `voxel`.
    pub fn midpoint(&self, voxel: Voxel) -> Point3 {
        Point3::generate(|i| (voxel[i] as f64 + 0.5) * self.bin_size - self.offset)
    }
}

/// Dense binary occupancy grid of `resolution³` cells.
///
/// Cells live in one flat array indexed `(i * b + j) * b + k`. Marking goes through `&self`
/// and may happen from many threads at once.
#[derive(Debug)]
pub struct OccupancyGrid {
    resolution: usize,
    cells: Vec<AtomicBool>,
}

impl OccupancyGrid {
    pub fn new(resolution: usize) -> Self {
        let size = resolution * resolution * resolution;
        OccupancyGrid {
            resolution,
            cells: (0..size).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, [i, j, k]: Voxel) -> usize {
        (i * self.resolution + j) * self.resolution + k
    }

    #[inline]
    fn voxel(&self, index: usize) -> Voxel {
        let b = self.resolution;
        [index / (b * b), (index / b) % b, index % b]
    }

    /// Mark `voxel` as occupied. Repeated marks have no effect.
    #[inline]
    pub fn mark(&self, voxel: Voxel) {
        self.cells[self.index(voxel)].store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_occupied(&self, voxel: Voxel) -> bool {
        self.cells[self.index(voxel)].load(Ordering::Relaxed)
    }

    /// Occupancy at a possibly out of grid position, outside cells are empty.
    #[inline]
    fn occupied_at(&self, [i, j, k]: [isize; 3]) -> bool {
        let b = self.resolution as isize;
        if (0..b).contains(&i) && (0..b).contains(&j) && (0..b).contains(&k) {
            self.is_occupied([i as usize, j as usize, k as usize])
        } else {
            false
        }
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.load(Ordering::Relaxed))
            .count()
    }

    /// Occupied cells among the 26 neighbours of `voxel`.
    pub fn neighbour_count(&self, voxel: Voxel) -> usize {
        let [i, j, k] = voxel.map(|c| c as isize);
        let mut count = 0;
        for di in -1..=1 {
            for dj in -1..=1 {
                for dk in -1..=1 {
                    if (di, dj, dk) != (0, 0, 0) && self.occupied_at([i + di, j + dj, k + dk]) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Occupied and not fully enclosed by occupied neighbours.
    pub fn is_surface(&self, voxel: Voxel) -> bool {
        self.is_occupied(voxel) && self.neighbour_count(voxel) < NEIGHBOURHOOD
    }

    /// All surface voxels in row-major order.
    pub fn surface_voxels(&self) -> Vec<Voxel> {
        (0..self.len())
            .into_par_iter()
            .map(|index| self.voxel(index))
            .filter(|voxel| self.is_surface(*voxel))
            .collect()
    }

    #[cfg(test)]
    fn snapshot(&self) -> Vec<bool> {
        self.cells
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let grid = OccupancyGrid::new(4);
        assert_eq!(grid.len(), 64);
        assert_eq!(grid.index([0, 0, 1]), 1);
        assert_eq!(grid.index([0, 1, 0]), 4);
        assert_eq!(grid.index([1, 0, 0]), 16);
        assert_eq!(grid.voxel(grid.index([3, 2, 1])), [3, 2, 1]);
    }

    #[test]
    fn idempotent_marking() {
        let once = OccupancyGrid::new(5);
        once.mark([1, 2, 3]);

        let twice = OccupancyGrid::new(5);
        twice.mark([1, 2, 3]);
        twice.mark([1, 2, 3]);

        assert_eq!(once.snapshot(), twice.snapshot());
        assert_eq!(twice.count(), 1);
    }

    #[test]
    fn isolated_voxel_is_surface() {
        let grid = OccupancyGrid::new(5);
        grid.mark([2, 2, 2]);

        assert_eq!(grid.neighbour_count([2, 2, 2]), 0);
        assert!(grid.is_surface([2, 2, 2]));
        assert_eq!(grid.surface_voxels(), vec![[2, 2, 2]]);
    }

    #[test]
    fn enclosed_voxel_is_interior() {
        let grid = OccupancyGrid::new(5);
        for i in 1..4 {
            for j in 1..4 {
                for k in 1..4 {
                    grid.mark([i, j, k]);
                }
            }
        }

        assert_eq!(grid.neighbour_count([2, 2, 2]), NEIGHBOURHOOD);
        assert!(!grid.is_surface([2, 2, 2]));

        let surface = grid.surface_voxels();
        assert_eq!(surface.len(), 26);
        assert!(!surface.contains(&[2, 2, 2]));
    }

    #[test]
    fn border_neighbours_are_empty() {
        let grid = OccupancyGrid::new(3);
        for index in 0..grid.len() {
            grid.mark(grid.voxel(index));
        }

        // only the center sees all 26 neighbours inside a full 3³ grid
        assert_eq!(grid.neighbour_count([0, 0, 0]), 7);
        assert_eq!(grid.surface_voxels().len(), 26);
    }

    #[test]
    fn empty_cells_are_not_surface() {
        let grid = OccupancyGrid::new(3);
        grid.mark([0, 0, 0]);
        assert!(!grid.is_surface([1, 1, 1]));
    }

    #[test]
    fn frame_mapping() {
        let bounds = AABB::from_corners(Point3::from([-2., -1., 0.]), Point3::from([8., 1., 1.]));
        let frame = VoxelFrame::enclosing(&bounds, 50).unwrap();

        assert_eq!(frame.offset, 2.5);
        assert!((frame.bin_size - 0.22).abs() < 1e-12);

        let p = Point3::from([1.3, -0.7, 0.4]);
        let voxel = frame.voxel(&p).unwrap();
        let midpoint = frame.midpoint(voxel);
        for axis in 0..3 {
            assert!((midpoint.nth(axis) - p.nth(axis)).abs() <= frame.bin_size / 2. + 1e-12);
        }
        let corner = frame.world(voxel);
        assert!(p.distance(&corner) < frame.bin_size * 3f64.sqrt());

        assert_eq!(frame.voxel(&Point3::from([-3., 0., 0.])), None);
        assert_eq!(frame.voxel(&Point3::from([20., 0., 0.])), None);
        assert_eq!(frame.voxel(&Point3::from([f64::NAN, 0., 0.])), None);
    }

    #[test]
    fn degenerate_frame() {
        let bounds = AABB::from_point(Point3::from([1., 1., 1.]));
        assert!(VoxelFrame::enclosing(&bounds, 50).is_err());

        let bounds = AABB::from_corners(Point3::from([0.; 3]), Point3::from([1.; 3]));
        assert!(VoxelFrame::enclosing(&bounds, 0).is_err());
    }
}
