use crate::{PointTrait, AABB};

/// Point cloud trait
pub trait PointCloudTrait {
    type Point: PointTrait;

    /// points in storage order
    fn points(&self) -> &[Self::Point];

    /// number of points the cloud is made of
    fn num_points(&self) -> usize {
        self.points().len()
    }

    fn is_empty(&self) -> bool {
        self.num_points() == 0
    }

    /// get axis aligned bounding box of points
    fn aabb(&self) -> AABB<Self::Point> {
        AABB::from_points(self.points())
    }
}
