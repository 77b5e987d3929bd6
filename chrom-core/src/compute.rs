use std::sync::Arc;

use arrow::{
    array::{ArrayRef, AsArray, Float64Array},
    compute::cast,
    datatypes::{DataType, Float64Type},
    error::ArrowError,
    record_batch::RecordBatch,
};
use rstar::Point as _;

use crate::{
    point::Point3,
    schema::{self, physical_schema, surface_schema},
    FeatureError,
};

/// Per bead features, one row of the physical table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRecord {
    pub location: Point3,
    pub dist_surface: f64,
    pub dist_com: f64,
    pub dist_rolling_mean: f64,
}

fn location_columns<'a>(points: impl Iterator<Item = &'a Point3> + Clone) -> Vec<ArrayRef> {
    (0..3)
        .map(|axis| {
            Arc::new(Float64Array::from_iter_values(
                points.clone().map(|p| p.nth(axis)),
            )) as ArrayRef
        })
        .collect()
}

/// Physical features table, one row per bead in chain order
pub fn physical_batch(records: &[DistanceRecord]) -> Result<RecordBatch, ArrowError> {
    let mut columns = location_columns(records.iter().map(|r| &r.location));
    columns.extend([
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.dist_surface),
        )) as ArrayRef,
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.dist_com),
        )) as ArrayRef,
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.dist_rolling_mean),
        )) as ArrayRef,
    ]);

    RecordBatch::try_new(physical_schema(), columns)
}

/// Surface table, one row per surface point
pub fn surface_batch(points: &[Point3]) -> Result<RecordBatch, ArrowError> {
    RecordBatch::try_new(surface_schema(), location_columns(points.iter()))
}

fn location_arrays(batch: &RecordBatch) -> Result<Vec<Float64Array>, FeatureError> {
    let schema = batch.schema();
    schema::validate(&schema)?;

    schema::dimensions(&schema)
        .into_iter()
        .map(|c| {
            let column = cast(batch.column(c), &DataType::Float64)?;
            Ok(column.as_primitive::<Float64Type>().to_owned())
        })
        .collect()
}

/// Locations stored in a table with tagged location columns
pub fn points(batch: &RecordBatch) -> Result<Vec<Point3>, FeatureError> {
    let columns = location_arrays(batch)?;

    Ok((0..batch.num_rows())
        .map(|i| Point3::generate(|axis| columns[axis].value(i)))
        .collect())
}
