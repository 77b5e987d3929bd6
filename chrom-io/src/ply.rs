use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use arrow::{
    array::AsArray,
    datatypes::{DataType, Field, Float32Type, Float64Type, Int32Type, Schema, SchemaRef},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchWriter},
};
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};

const DEFAULT_VERTEX_ELEMENT_NAME: &str = "vertex";

/// Ascii ply point cloud writer, one vertex per row
pub struct PlyWriter {
    target: PathBuf,
    schema: SchemaRef,
    elements: Vec<DefaultElement>,
}

impl PlyWriter {
    pub fn new<P: AsRef<Path>>(path: P, schema: SchemaRef) -> Self {
        PlyWriter {
            target: path.as_ref().to_owned(),
            schema,
            elements: Vec::new(),
        }
    }
}

impl RecordBatchWriter for PlyWriter {
    fn write(&mut self, batch: &RecordBatch) -> Result<(), ArrowError> {
        for i in 0..batch.num_rows() {
            let element = element_from_row(i, batch)?;
            self.elements.push(element);
        }
        Ok(())
    }

    fn close(self) -> Result<(), ArrowError> {
        let file = File::create(&self.target).map_err(|e| ArrowError::ExternalError(e.into()))?;
        let mut dst = BufWriter::new(file);

        let mut ply = Ply::<DefaultElement>::new();
        ply.header.encoding = Encoding::Ascii;

        // element count is set by `make_consistent` during writing
        let element = element_definition_from_schema(&self.schema)?;
        ply.header.elements.add(element);

        ply.payload
            .insert(DEFAULT_VERTEX_ELEMENT_NAME.to_string(), self.elements);

        let w = ply_rs::writer::Writer::new();
        w.write_ply(&mut dst, &mut ply)
            .map_err(|e| ArrowError::ExternalError(e.into()))?;

        tracing::debug!("Wrote ply to {}", self.target.display());
        Ok(())
    }
}

fn element_definition_from_schema(schema: &Schema) -> Result<ElementDef, ArrowError> {
    let mut element = ElementDef::new(DEFAULT_VERTEX_ELEMENT_NAME.to_string());

    for f in schema.fields().iter() {
        let property = property_definition_from_field(f)?;
        element.properties.add(property);
    }

    Ok(element)
}

fn property_definition_from_field(field: &Field) -> Result<PropertyDef, ArrowError> {
    let data_type = match field.data_type() {
        DataType::Int32 => PropertyType::Scalar(ScalarType::Int),
        DataType::Float32 => PropertyType::Scalar(ScalarType::Float),
        DataType::Float64 => PropertyType::Scalar(ScalarType::Double),
        x => {
            return Err(ArrowError::NotYetImplemented(format!(
                "ply property of type {x}"
            )))
        }
    };
    Ok(PropertyDef::new(field.name().to_owned(), data_type))
}

fn element_from_row(i: usize, batch: &RecordBatch) -> Result<DefaultElement, ArrowError> {
    let mut element = DefaultElement::new();
    for (f, column) in batch.schema().fields().iter().zip(batch.columns()) {
        let value = match f.data_type() {
            DataType::Int32 => Property::Int(column.as_primitive::<Int32Type>().value(i)),
            DataType::Float32 => Property::Float(column.as_primitive::<Float32Type>().value(i)),
            DataType::Float64 => Property::Double(column.as_primitive::<Float64Type>().value(i)),
            x => {
                return Err(ArrowError::NotYetImplemented(format!(
                    "ply property of type {x}"
                )))
            }
        };

        element.insert(f.name().to_owned(), value);
    }

    Ok(element)
}
