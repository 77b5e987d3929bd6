use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use arrow::{
    array::{ArrayRef, AsArray, Int64Array},
    datatypes::{DataType, Field, Float64Type, Schema, SchemaRef},
    record_batch::RecordBatch,
};

use chrom_core::schema::{physical_schema, surface_schema};

use crate::{
    csv::read_csv,
    table::{output_path, write_table},
    FormatExt, IoError,
};

/// Decimals kept in compiled tables
pub const ROUND_DECIMALS: i32 = 4;

/// Annotation columns dropped when merging, the bead order carries the mapping
const DROPPED_ANNOTATIONS: [&str; 2] = ["bead", "chr"];

#[derive(clap::Args, Debug)]
pub struct CompileArgs {
    /// Chromosome number
    #[arg(long = "chr")]
    pub chromosome: i64,
    /// Path to the physical features csv
    #[arg(long)]
    pub physical: PathBuf,
    /// Path to the surface points csv
    #[arg(long)]
    pub surface: PathBuf,
    /// Path to the annotations csv
    #[arg(long)]
    pub annotations: PathBuf,
    /// Output directory
    #[arg(long, env = "CHROM_OUTDIR", default_value = ".")]
    pub outdir: PathBuf,
}

/// Per bead annotations, one row per bead in chain order
pub fn annotation_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("bead", DataType::Int64, true),
        Field::new("chr", DataType::Int64, true),
        Field::new("start", DataType::Int64, true),
        Field::new("end", DataType::Int64, true),
        Field::new("gc_content", DataType::Float64, true),
        Field::new("gene_density", DataType::Float64, true),
    ]))
}

/// Round float columns to `decimals`, other columns pass through
pub fn round(column: &ArrayRef, decimals: i32) -> ArrayRef {
    match column.data_type() {
        DataType::Float64 => {
            let factor = 10f64.powi(decimals);
            Arc::new(
                column
                    .as_primitive::<Float64Type>()
                    .unary::<_, Float64Type>(|v| (v * factor).round() / factor),
            )
        }
        _ => column.clone(),
    }
}

/// Join physical features and annotations row by row and tag them with the chromosome.
pub fn merge(
    physical: &RecordBatch,
    annotations: &RecordBatch,
    chromosome: i64,
) -> Result<RecordBatch, IoError> {
    if physical.num_rows() != annotations.num_rows() {
        return Err(IoError::RowMismatch {
            left: physical.num_rows(),
            right: annotations.num_rows(),
        });
    }

    let mut fields = Vec::new();
    let mut columns = Vec::new();

    for (field, column) in physical.schema().fields().iter().zip(physical.columns()) {
        fields.push(field.as_ref().clone());
        columns.push(round(column, ROUND_DECIMALS));
    }

    for (field, column) in annotations
        .schema()
        .fields()
        .iter()
        .zip(annotations.columns())
        .filter(|(f, _)| !DROPPED_ANNOTATIONS.contains(&f.name().as_str()))
    {
        fields.push(field.as_ref().clone());
        columns.push(round(column, ROUND_DECIMALS));
    }

    fields.push(Field::new("chr", DataType::Int64, false));
    columns.push(Arc::new(Int64Array::from_value(chromosome, physical.num_rows())) as ArrayRef);

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Merge the tables of one chromosome into parquet files.
///
/// Returns the paths of the compiled and the surface table.
pub fn compile<P: AsRef<Path>>(
    chromosome: i64,
    physical: P,
    surface: P,
    annotations: P,
    outdir: P,
) -> Result<(PathBuf, PathBuf), IoError> {
    let physical = read_csv(physical, physical_schema())?;
    let annotations = read_csv(annotations, annotation_schema())?;
    let surface = read_csv(surface, surface_schema())?;

    let merged = merge(&physical, &annotations, chromosome)?;

    std::fs::create_dir_all(&outdir)?;
    let chromosome = chromosome.to_string();
    let compiled_path = output_path(&outdir, &chromosome, "compiled", FormatExt::Parquet);
    let surface_path = output_path(&outdir, &chromosome, "surface", FormatExt::Parquet);

    write_table(&merged, &compiled_path, FormatExt::Parquet)?;
    write_table(&surface, &surface_path, FormatExt::Parquet)?;

    tracing::info!(
        "Compiled {} beads with {} columns, {} surface points",
        merged.num_rows(),
        merged.num_columns(),
        surface.num_rows()
    );

    Ok((compiled_path, surface_path))
}

impl CompileArgs {
    pub fn run(&self) -> Result<(PathBuf, PathBuf), IoError> {
        compile(
            self.chromosome,
            self.physical.as_path(),
            self.surface.as_path(),
            self.annotations.as_path(),
            self.outdir.as_path(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::{
        array::{Array, Float64Array},
        datatypes::Int64Type,
    };
    use chrom_core::{
        compute::{physical_batch, DistanceRecord},
        Point3,
    };

    use crate::parquet::read_parquet;

    use super::*;

    fn physical(rows: usize) -> RecordBatch {
        let records: Vec<DistanceRecord> = (0..rows)
            .map(|i| DistanceRecord {
                location: Point3::from([i as f64 + 0.123456, 1., 2.]),
                dist_surface: 0.333333,
                dist_com: 1.987654321,
                dist_rolling_mean: 0.,
            })
            .collect();
        physical_batch(&records).unwrap()
    }

    fn write_annotations(path: &Path, rows: usize) {
        let mut f = std::fs::File::create(path).unwrap();
        writeln!(f, "bead,chr,start,end,gc_content,gene_density").unwrap();
        for i in 0..rows {
            writeln!(
                f,
                "{i},3,{},{},0.412345,0.00012",
                i * 100_000,
                (i + 1) * 100_000
            )
            .unwrap();
        }
    }

    #[test]
    fn merged_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        write_annotations(&path, 3);
        let annotations = read_csv(&path, annotation_schema()).unwrap();

        let merged = merge(&physical(3), &annotations, 3).unwrap();

        let names: Vec<_> = merged
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().to_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "x",
                "y",
                "z",
                "dist_surface",
                "dist_com",
                "dist_rolling_mean",
                "start",
                "end",
                "gc_content",
                "gene_density",
                "chr"
            ]
        );

        let column = |name: &str| {
            merged
                .column_by_name(name)
                .unwrap()
                .as_primitive::<Float64Type>()
                .value(0)
        };
        assert_eq!(column("x"), 0.1235);
        assert_eq!(column("dist_com"), 1.9877);
        assert_eq!(column("gc_content"), 0.4123);
        assert_eq!(column("gene_density"), 0.0001);

        let chr = merged
            .column_by_name("chr")
            .unwrap()
            .as_primitive::<Int64Type>();
        assert!(chr.values().iter().all(|c| *c == 3));
        assert_eq!(chr.null_count(), 0);
    }

    #[test]
    fn row_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");
        write_annotations(&path, 2);
        let annotations = read_csv(&path, annotation_schema()).unwrap();

        assert!(matches!(
            merge(&physical(3), &annotations, 1),
            Err(IoError::RowMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn rounding_passes_other_types() {
        let ints: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        assert_eq!(&round(&ints, 2), &ints);

        let floats: ArrayRef = Arc::new(Float64Array::from(vec![1.23456, -0.00004]));
        let rounded = round(&floats, 4);
        assert_eq!(
            rounded.as_primitive::<Float64Type>().values().to_vec(),
            vec![1.2346, -0.]
        );
    }

    #[test]
    fn compiled_files() {
        let dir = tempfile::tempdir().unwrap();
        let annotations = dir.path().join("annotations.csv");
        write_annotations(&annotations, 4);

        let physical_path = dir.path().join("chr5_physical.csv");
        write_table(&physical(4), &physical_path, FormatExt::CSV).unwrap();

        let surface_path = dir.path().join("chr5_surface.csv");
        let surface = chrom_core::compute::surface_batch(&[Point3::from([1., 2., 3.])]).unwrap();
        write_table(&surface, &surface_path, FormatExt::CSV).unwrap();

        let out = dir.path().join("compiled");
        let (compiled, surface) = compile(
            5,
            physical_path.as_path(),
            surface_path.as_path(),
            annotations.as_path(),
            out.as_path(),
        )
        .unwrap();

        assert_eq!(compiled, out.join("chr5_compiled.parquet"));
        assert_eq!(surface, out.join("chr5_surface.parquet"));

        let compiled = read_parquet(compiled).unwrap();
        assert_eq!(compiled.num_rows(), 4);
        assert_eq!(compiled.num_columns(), 11);
        assert_eq!(read_parquet(surface).unwrap().num_rows(), 1);
    }
}
