use std::{collections::HashMap, sync::Arc};

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use itertools::Itertools;

use crate::FeatureError;

/// Indexable spatial dimension.
///
/// Integer values define order.
pub const CHROM_DIMENSION_KEY: &str = "CHROM:dimension";

pub const CHROM_LOCATION_KEY: &str = "CHROM:location";

/// Reference set a distance column was measured against.
pub const CHROM_REFERENCE_KEY: &str = "CHROM:reference";

pub const DIST_SURFACE: &str = "dist_surface";
pub const DIST_COM: &str = "dist_com";
pub const DIST_ROLLING_MEAN: &str = "dist_rolling_mean";

/// Location field tagged with its dimension order
pub fn location_field(name: &str, dimension: usize, data_type: DataType) -> Field {
    Field::new(name, data_type, false).with_metadata(HashMap::from([
        (CHROM_DIMENSION_KEY.to_owned(), dimension.to_string()),
        (CHROM_LOCATION_KEY.to_owned(), name.to_owned()),
    ]))
}

fn distance_field(name: &str, reference: &str) -> Field {
    Field::new(name, DataType::Float64, false).with_metadata(HashMap::from([(
        CHROM_REFERENCE_KEY.to_owned(),
        reference.to_owned(),
    )]))
}

/// Schema of the surface table: one row per surface point.
pub fn surface_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        location_field("x", 1, DataType::Float64),
        location_field("y", 2, DataType::Float64),
        location_field("z", 3, DataType::Float64),
    ]))
}

/// Schema of the physical features table: one row per bead.
pub fn physical_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        location_field("x", 1, DataType::Float64),
        location_field("y", 2, DataType::Float64),
        location_field("z", 3, DataType::Float64),
        distance_field(DIST_SURFACE, "surface"),
        distance_field(DIST_COM, "center_of_mass"),
        distance_field(DIST_ROLLING_MEAN, "smoothed_path"),
    ]))
}

/// extract dimensions from schema
pub fn dimensions(schema: &SchemaRef) -> Vec<usize> {
    schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| f.metadata().contains_key(CHROM_DIMENSION_KEY))
        .sorted_by_key(|(_, f)| f.metadata().get(CHROM_DIMENSION_KEY))
        .map(|(i, _)| i)
        .collect_vec()
}

/// check that a schema carries three numeric location dimensions
pub fn validate(schema: &SchemaRef) -> Result<(), FeatureError> {
    let dimensions = dimensions(schema);

    if dimensions.len() != 3 {
        return Err(FeatureError::SchemaError(format!(
            "expected 3 location dimensions, found {}",
            dimensions.len()
        )));
    }

    if !dimensions
        .iter()
        .all(|i| schema.field(*i).data_type().is_numeric())
    {
        return Err(FeatureError::SchemaError(
            "schema has non numeric dimensions specified".to_string(),
        ));
    }

    Ok(())
}
