use arrow::record_batch::RecordBatch;
use crate::{
    chain::Chain,
    compute::{physical_batch, surface_batch, DistanceRecord},
    distance::{center_distances, path_distances, surface_distances, ReferenceKind},
    point::Point3,
    smoothing::{PathSmoother, DEFAULT_WINDOW},
    sphere::DEFAULT_SUBDIVISIONS,
    surface::{Surface, SurfaceReconstructor, DEFAULT_RESOLUTION},
    FeatureError,
};

/// Tunables of a feature run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureParams {
    /// sliding window of the smoothed path
    pub window: usize,
    /// angular subdivisions of the bead spheres
    pub subdivisions: usize,
    /// occupancy grid cells per axis
    pub resolution: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        FeatureParams {
            window: DEFAULT_WINDOW,
            subdivisions: DEFAULT_SUBDIVISIONS,
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl FeatureParams {
    /// Check the parameters against a chain of `beads` beads.
    pub fn validate(&self, beads: usize) -> Result<(), FeatureError> {
        if beads < 2 {
            return Err(FeatureError::ChainTooShort(beads));
        }
        if self.window == 0 {
            return Err(FeatureError::InvalidWindow);
        }
        if self.window >= beads {
            return Err(FeatureError::WindowTooLarge {
                window: self.window,
                beads,
            });
        }
        SurfaceReconstructor::try_new(self.subdivisions, self.resolution).map(|_| ())
    }
}

/// Per bead distances and the reconstructed surface of one chain
#[derive(Debug, Clone)]
pub struct PhysicalFeatures {
    pub records: Vec<DistanceRecord>,
    pub surface: Surface,
}

impl PhysicalFeatures {
    /// Physical features table
    pub fn physical_batch(&self) -> Result<RecordBatch, FeatureError> {
        Ok(physical_batch(&self.records)?)
    }

    /// Surface table
    pub fn surface_batch(&self) -> Result<RecordBatch, FeatureError> {
        Ok(surface_batch(&self.surface.points)?)
    }
}

/// Compute all bead features of `chain`.
///
/// The center and path branches run next to the surface branch; surface distances wait for
/// the reconstruction.
pub fn compute_features(
    chain: &Chain,
    params: &FeatureParams,
) -> Result<PhysicalFeatures, FeatureError> {
    let beads = chain.beads();
    params.validate(beads.len())?;
    if chain.centers().is_empty() {
        return Err(FeatureError::EmptyReferenceSet(ReferenceKind::CenterOfMass));
    }

    let smoother = PathSmoother::new(params.window)?;
    let reconstructor = SurfaceReconstructor::try_new(params.subdivisions, params.resolution)?;
    tracing::debug!("Computing features for {} beads with {params:?}", beads.len());

    let ((dist_com, dist_rolling_mean), surface) = rayon::join(
        || {
            rayon::join(
                || center_distances(beads, chain.centers()),
                || smoothed_path_distances(&smoother, beads),
            )
        },
        || -> Result<(Surface, Vec<f64>), FeatureError> {
            let surface = reconstructor.reconstruct(beads)?;
            let distances = surface_distances(beads, &surface.points)?;
            Ok((surface, distances))
        },
    );
    let (surface, dist_surface) = surface?;
    let (dist_com, dist_rolling_mean) = (dist_com?, dist_rolling_mean?);

    let records = beads
        .iter()
        .zip(dist_surface)
        .zip(dist_com)
        .zip(dist_rolling_mean)
        .map(
            |(((location, dist_surface), dist_com), dist_rolling_mean)| DistanceRecord {
                location: *location,
                dist_surface,
                dist_com,
                dist_rolling_mean,
            },
        )
        .collect();

    tracing::info!(
        "Computed features for {} beads, {} surface points",
        beads.len(),
        surface.points.len()
    );

    Ok(PhysicalFeatures { records, surface })
}

fn smoothed_path_distances(
    smoother: &PathSmoother,
    beads: &[Point3],
) -> Result<Vec<f64>, FeatureError> {
    let path = smoother.smooth(beads);
    if path.is_empty() {
        tracing::warn!("Smoothed path is empty");
        return Err(FeatureError::DegeneratePath {
            window: smoother.window(),
            beads: beads.len(),
        });
    }
    path_distances(beads, &path)
}
