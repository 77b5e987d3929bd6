use std::path::{Path, PathBuf};

use arrow::{
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchWriter},
};

use crate::{csv, parquet, ply::PlyWriter, FormatExt, IoError};

/// Output path `chr{chromosome}_{table}.<ext>` inside `dir`
pub fn output_path<P: AsRef<Path>>(
    dir: P,
    chromosome: &str,
    table: &str,
    format: FormatExt,
) -> PathBuf {
    dir.as_ref()
        .join(format!("chr{chromosome}_{table}"))
        .with_extension(format)
}

/// Write a single batch to `path` in the given format.
pub fn write_table<P: AsRef<Path>>(
    batch: &RecordBatch,
    path: P,
    format: FormatExt,
) -> Result<(), IoError> {
    let path = path.as_ref();
    match format {
        FormatExt::CSV => write_batch(csv::writer(path)?, batch)?,
        FormatExt::Parquet => write_batch(parquet::writer(path, batch.schema())?, batch)?,
        FormatExt::PLY => write_batch(PlyWriter::new(path, batch.schema()), batch)?,
    }

    tracing::info!("Saved {} ({} rows)", path.display(), batch.num_rows());
    Ok(())
}

fn write_batch(mut writer: impl RecordBatchWriter, batch: &RecordBatch) -> Result<(), ArrowError> {
    writer.write(batch)?;
    writer.close()
}
