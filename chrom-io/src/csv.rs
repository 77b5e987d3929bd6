use std::{fs::File, path::Path};

use arrow::{
    compute::concat_batches,
    csv::{ReaderBuilder, Writer, WriterBuilder},
    datatypes::SchemaRef,
    record_batch::RecordBatch,
};

use crate::IoError;

/// Csv table writer with a header row
pub fn writer<P: AsRef<Path>>(path: P) -> Result<Writer<File>, IoError> {
    let file = File::create(path)?;
    Ok(WriterBuilder::new().with_header(true).build(file))
}

/// Read a csv file with header into a single batch of the given schema
pub fn read_csv<P: AsRef<Path>>(path: P, schema: SchemaRef) -> Result<RecordBatch, IoError> {
    let file = File::open(path)?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}
