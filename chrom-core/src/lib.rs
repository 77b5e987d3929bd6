pub mod aabb;
pub use aabb::AABB;

pub mod chain;
pub use chain::Chain;

pub mod compute;

pub mod distance;
pub use distance::ReferenceKind;

pub mod features;
pub use features::{compute_features, FeatureParams, PhysicalFeatures};

pub mod grid;

pub mod point;
pub use point::{Coord, Point, Point3, PointTrait};

pub mod pointcloud;
pub use pointcloud::PointCloudTrait;

pub mod schema;

pub mod smoothing;

pub mod sphere;

pub mod surface;

/// Coarse classification of [`FeatureError`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// invalid input or tunables
    Configuration,
    /// inputs were valid but the geometry collapsed
    DegenerateResult,
    /// tunables beyond the supported memory bounds
    ResourceLimit,
    /// table assembly
    Table,
}

#[derive(thiserror::Error, Debug)]
pub enum FeatureError {
    #[error("chain needs at least 2 beads, got {0}")]
    ChainTooShort(usize),
    #[error("smoothing window must be positive")]
    InvalidWindow,
    #[error("smoothing window {window} must be smaller than the chain length {beads}")]
    WindowTooLarge { window: usize, beads: usize },
    #[error("sphere radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("{name} must be at least {min}, got {value}")]
    InvalidResolution {
        name: &'static str,
        value: usize,
        min: usize,
    },
    #[error("{name} {value} exceeds the limit of {max}")]
    ResolutionTooLarge {
        name: &'static str,
        value: usize,
        max: usize,
    },
    #[error("{0} reference set is empty")]
    EmptyReferenceSet(ReferenceKind),
    #[error("no surface voxels found among {occupied} occupied of {cells} cells")]
    DegenerateSurface { occupied: usize, cells: usize },
    #[error("sphere points span a degenerate extent {extent}")]
    DegenerateGrid { extent: f64 },
    #[error("smoothing window {window} leaves no path points for {beads} beads")]
    DegeneratePath { window: usize, beads: usize },
    #[error("schema validation error: {0}")]
    SchemaError(String),
    #[error("arrow error")]
    ArrowError(#[from] arrow::error::ArrowError),
}

impl FeatureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeatureError::ChainTooShort(_)
            | FeatureError::InvalidWindow
            | FeatureError::WindowTooLarge { .. }
            | FeatureError::NonPositiveRadius(_)
            | FeatureError::InvalidResolution { .. } => ErrorKind::Configuration,
            FeatureError::EmptyReferenceSet(ReferenceKind::Surface) => {
                ErrorKind::DegenerateResult
            }
            FeatureError::EmptyReferenceSet(_) => ErrorKind::Configuration,
            FeatureError::ResolutionTooLarge { .. } => ErrorKind::ResourceLimit,
            FeatureError::DegenerateSurface { .. }
            | FeatureError::DegenerateGrid { .. }
            | FeatureError::DegeneratePath { .. } => ErrorKind::DegenerateResult,
            FeatureError::SchemaError(_) | FeatureError::ArrowError(_) => ErrorKind::Table,
        }
    }
}
