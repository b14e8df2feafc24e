use serde_json::{Map, Value};

use crate::feature::{GeoJsonFeature, GeoJsonFeatureCollection};
use crate::schema::Schema;
use crate::schema::field;
use crate::schema::validate::{
    NOT_A_LIST, NOT_A_MAPPING, NOT_A_STRING, NULL, as_object, check_type, child, optional_bbox,
    require,
};
use crate::utils::error::ValidationErrors;

fn optional_id(map: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<String> {
    match map.get("id") {
        None => None,
        Some(Value::Null) => {
            errors.add("id", NULL);
            None
        }
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => {
            errors.add("id", NOT_A_STRING);
            None
        }
    }
}

fn properties(map: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<Map<String, Value>> {
    match require(map, "properties", errors)? {
        Value::Object(properties) => Some(properties.clone()),
        _ => {
            errors.add("properties", NOT_A_MAPPING);
            None
        }
    }
}

/// Validates a Feature: a mandatory geometry, a properties mapping and an
/// optional string id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureSchema;

impl Schema for FeatureSchema {
    type Output = GeoJsonFeature;

    fn load(&self, value: &Value) -> Result<GeoJsonFeature, ValidationErrors> {
        let map = as_object(value)?;
        let mut errors = ValidationErrors::new();
        check_type(map, GeoJsonFeature::TYPE, &mut errors);
        let id = optional_id(map, &mut errors);
        let geometry = require(map, "geometry", &mut errors)
            .and_then(|value| field::load_field(value, "geometry", &mut errors));
        let properties = properties(map, &mut errors);
        optional_bbox(map, &mut errors);
        match (geometry, properties) {
            (Some(geometry), Some(properties)) if errors.is_empty() => {
                Ok(GeoJsonFeature::from_parts(geometry, properties, id))
            }
            _ => Err(errors),
        }
    }
}

/// Validates a FeatureCollection; member errors are reported under
/// `features.<index>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureCollectionSchema;

impl Schema for FeatureCollectionSchema {
    type Output = GeoJsonFeatureCollection;

    fn load(&self, value: &Value) -> Result<GeoJsonFeatureCollection, ValidationErrors> {
        let map = as_object(value)?;
        let mut errors = ValidationErrors::new();
        check_type(map, GeoJsonFeatureCollection::TYPE, &mut errors);
        let mut features = Vec::new();
        if let Some(members) = require(map, "features", &mut errors) {
            match members.as_array() {
                Some(members) => {
                    for (i, member) in members.iter().enumerate() {
                        match FeatureSchema.load(member) {
                            Ok(feature) => features.push(feature),
                            Err(nested) => errors.extend_nested(&child("features", i), nested),
                        }
                    }
                }
                None => errors.add("features", NOT_A_LIST),
            }
        }
        optional_bbox(map, &mut errors);
        errors.finish(GeoJsonFeatureCollection::new(features))
    }
}
