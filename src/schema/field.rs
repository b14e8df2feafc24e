//! Codec for a geometry embedded as a field of a larger structure.
//!
//! Loading goes through the geometry parser; unlike the parser itself,
//! input that is not a geometry is an error here.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::geometry::types::GeoJsonGeometry;
use crate::parse::{DiagnosticSink, GeometryInput, GeometryParser};
use crate::schema::validate::UNKNOWN_GEOMETRY;
use crate::utils::error::{Error, ValidationErrors};

/// Load a geometry field, failing with `Error::UnknownGeometry` when the
/// value is not one of the six geometry types.
pub fn load(value: &Value) -> Result<GeoJsonGeometry, Error> {
    load_with(&GeometryParser::new(), value)
}

/// [`load`] with diagnostics going to `parser`'s sink.
pub fn load_with<S: DiagnosticSink>(
    parser: &GeometryParser<S>,
    value: &Value,
) -> Result<GeoJsonGeometry, Error> {
    match parser.parse_geometry(GeometryInput::from(value)) {
        Ok(Some(geometry)) => Ok(geometry),
        Ok(None) | Err(_) => Err(Error::UnknownGeometry),
    }
}

/// Load a geometry field at `path`, recording a failure in `errors`.
pub fn load_field(
    value: &Value,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<GeoJsonGeometry> {
    match load(value) {
        Ok(geometry) => Some(geometry),
        Err(_) => {
            errors.add(path, UNKNOWN_GEOMETRY);
            None
        }
    }
}

/// The canonical `{type, coordinates, bbox}` mapping.
pub fn dump(geometry: &GeoJsonGeometry) -> Value {
    geometry.to_value()
}

/// Normalise a geometry from the `geojson` crate through its serde form.
pub fn dump_generic(geometry: &geojson::Geometry) -> Result<Value, Error> {
    let value = serde_json::to_value(geometry)?;
    let geometry: geojson::Geometry = serde_json::from_value(value)?;
    Ok(serde_json::to_value(&geometry)?)
}

/// For use with `#[serde(with = "geoschema::schema::field")]`.
pub fn serialize<S: Serializer>(geometry: &GeoJsonGeometry, serializer: S) -> Result<S::Ok, S::Error> {
    geometry.serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GeoJsonGeometry, D::Error> {
    let value = Value::deserialize(deserializer)?;
    load(&value).map_err(serde::de::Error::custom)
}
