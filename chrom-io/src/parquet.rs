use std::{fs::File, path::Path};

use arrow::{compute::concat_batches, datatypes::SchemaRef, record_batch::RecordBatch};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::{Compression, Encoding, ZstdLevel},
    file::properties::WriterProperties,
};

use chrom_core::schema;

use crate::IoError;

/// ZSTD compressed, plain encoded location columns
pub fn writer_properties(schema: &SchemaRef) -> WriterProperties {
    let mut builder =
        WriterProperties::builder().set_compression(Compression::ZSTD(ZstdLevel::default()));

    for i in schema::dimensions(schema) {
        let name = schema.field(i).name().as_str();
        builder = builder
            .set_column_encoding(name.into(), Encoding::PLAIN)
            .set_column_dictionary_enabled(name.into(), false);
    }

    builder.build()
}

/// Parquet table writer
pub fn writer<P: AsRef<Path>>(path: P, schema: SchemaRef) -> Result<ArrowWriter<File>, IoError> {
    let file = File::create(path)?;
    let options = writer_properties(&schema);
    Ok(ArrowWriter::try_new(file, schema, Some(options))?)
}

/// Read all row groups of a parquet file into a single batch
pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<RecordBatch, IoError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}
