use std::path::{Path, PathBuf};

use chrom_core::{
    compute_features, smoothing::DEFAULT_WINDOW, sphere::DEFAULT_SUBDIVISIONS,
    surface::DEFAULT_RESOLUTION, FeatureParams,
};

use crate::{
    pdb::read_structure,
    table::{output_path, write_table},
    FormatExt, IoError,
};

#[derive(clap::Args, Debug)]
pub struct ComputeArgs {
    /// Path to the PDB structure
    #[arg(long)]
    pub pdb: PathBuf,
    /// Chromosome number
    #[arg(long = "chr")]
    pub chromosome: String,
    /// Output directory
    #[arg(long, env = "CHROM_OUTDIR", default_value = ".")]
    pub outdir: PathBuf,
    /// Output table format
    #[arg(long, value_enum, default_value_t = FormatExt::CSV)]
    pub format: FormatExt,
    /// Sliding window of the smoothed path
    #[arg(long, env = "CHROM_WINDOW", default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
    /// Angular subdivisions of the bead spheres
    #[arg(long, env = "CHROM_SUBDIVISIONS", default_value_t = DEFAULT_SUBDIVISIONS)]
    pub subdivisions: usize,
    /// Occupancy grid cells per axis
    #[arg(long, env = "CHROM_RESOLUTION", default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: usize,
}

impl ComputeArgs {
    pub fn params(&self) -> FeatureParams {
        FeatureParams {
            window: self.window,
            subdivisions: self.subdivisions,
            resolution: self.resolution,
        }
    }
}

/// Compute bead features of a structure and write the physical and surface tables.
///
/// Returns the paths of the physical and the surface table.
pub fn compute<P: AsRef<Path>, Q: AsRef<Path>>(
    pdb: P,
    chromosome: &str,
    outdir: Q,
    format: FormatExt,
    params: &FeatureParams,
) -> Result<(PathBuf, PathBuf), IoError> {
    let chain = read_structure(&pdb)?;
    tracing::info!(
        "Loaded {} beads and {} frames from {}",
        chain.beads().len(),
        chain.centers().len(),
        pdb.as_ref().display()
    );

    let features = compute_features(&chain, params)?;

    std::fs::create_dir_all(&outdir)?;
    let physical = output_path(&outdir, chromosome, "physical", format);
    let surface = output_path(&outdir, chromosome, "surface", format);

    write_table(&features.physical_batch()?, &physical, format)?;
    write_table(&features.surface_batch()?, &surface, format)?;

    Ok((physical, surface))
}
