use serde_json::Value;

use crate::geometry::collection::GeoJsonGeometryCollection;
use crate::geometry::types::{
    GeoJsonGeometry, GeoJsonLineString, GeoJsonMultiLineString, GeoJsonMultiPoint,
    GeoJsonMultiPolygon, GeoJsonPoint, GeoJsonPolygon,
};
use crate::schema::Schema;
use crate::schema::field;
use crate::schema::validate::{
    as_object, check_type, child, lines, optional_bbox, polygons, position, positions, require,
    rings, NOT_A_LIST,
};
use crate::utils::error::ValidationErrors;

// Shared body of the six per-type schemas. A wrong tag is reported alone,
// before any structure is checked.
fn load_geometry<C, T, P, B>(
    value: &Value,
    tag: &str,
    parse: P,
    build: B,
) -> Result<T, ValidationErrors>
where
    P: Fn(&Value, &str, &mut ValidationErrors) -> Option<C>,
    B: FnOnce(C) -> T,
{
    let map = as_object(value)?;
    let mut errors = ValidationErrors::new();
    check_type(map, tag, &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }
    let coordinates = require(map, "coordinates", &mut errors)
        .and_then(|value| parse(value, "coordinates", &mut errors));
    optional_bbox(map, &mut errors);
    match coordinates {
        Some(coordinates) if errors.is_empty() => Ok(build(coordinates)),
        _ => Err(errors),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PointSchema;

impl Schema for PointSchema {
    type Output = GeoJsonPoint;

    fn load(&self, value: &Value) -> Result<GeoJsonPoint, ValidationErrors> {
        load_geometry(value, GeoJsonPoint::TYPE, position, GeoJsonPoint::new)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MultiPointSchema;

impl Schema for MultiPointSchema {
    type Output = GeoJsonMultiPoint;

    fn load(&self, value: &Value) -> Result<GeoJsonMultiPoint, ValidationErrors> {
        load_geometry(
            value,
            GeoJsonMultiPoint::TYPE,
            |value, path, errors| positions(value, path, 0, errors),
            GeoJsonMultiPoint::new,
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LineStringSchema;

impl Schema for LineStringSchema {
    type Output = GeoJsonLineString;

    fn load(&self, value: &Value) -> Result<GeoJsonLineString, ValidationErrors> {
        load_geometry(
            value,
            GeoJsonLineString::TYPE,
            |value, path, errors| positions(value, path, 2, errors),
            GeoJsonLineString::new,
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MultiLineStringSchema;

impl Schema for MultiLineStringSchema {
    type Output = GeoJsonMultiLineString;

    fn load(&self, value: &Value) -> Result<GeoJsonMultiLineString, ValidationErrors> {
        load_geometry(
            value,
            GeoJsonMultiLineString::TYPE,
            lines,
            GeoJsonMultiLineString::new,
        )
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PolygonSchema;

impl Schema for PolygonSchema {
    type Output = GeoJsonPolygon;

    fn load(&self, value: &Value) -> Result<GeoJsonPolygon, ValidationErrors> {
        load_geometry(value, GeoJsonPolygon::TYPE, rings, GeoJsonPolygon::new)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MultiPolygonSchema;

impl Schema for MultiPolygonSchema {
    type Output = GeoJsonMultiPolygon;

    fn load(&self, value: &Value) -> Result<GeoJsonMultiPolygon, ValidationErrors> {
        load_geometry(
            value,
            GeoJsonMultiPolygon::TYPE,
            polygons,
            GeoJsonMultiPolygon::new,
        )
    }
}

/// A loader that lifts a per-type schema into the geometry enum.
pub type GeometryLoader = fn(&Value) -> Result<GeoJsonGeometry, ValidationErrors>;

fn loader<S>(value: &Value) -> Result<GeoJsonGeometry, ValidationErrors>
where
    S: Schema + Default,
    S::Output: Into<GeoJsonGeometry>,
{
    S::default().load(value).map(Into::into)
}

/// The geometry schemas in the order they are tried.
pub const GEOMETRY_SCHEMAS: [(&str, GeometryLoader); 6] = [
    (GeoJsonPoint::TYPE, loader::<PointSchema>),
    (GeoJsonLineString::TYPE, loader::<LineStringSchema>),
    (GeoJsonPolygon::TYPE, loader::<PolygonSchema>),
    (GeoJsonMultiPoint::TYPE, loader::<MultiPointSchema>),
    (GeoJsonMultiLineString::TYPE, loader::<MultiLineStringSchema>),
    (GeoJsonMultiPolygon::TYPE, loader::<MultiPolygonSchema>),
];

/// The first schema that accepts `value`, if any.
pub fn load_any(value: &Value) -> Option<GeoJsonGeometry> {
    GEOMETRY_SCHEMAS
        .iter()
        .find_map(|(_, load)| load(value).ok())
}

/// Validates a GeometryCollection mapping.
///
/// Unlike [`GeoJsonGeometryCollection::new`], a member that is not a
/// geometry fails the whole load.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeometryCollectionSchema;

impl Schema for GeometryCollectionSchema {
    type Output = GeoJsonGeometryCollection;

    fn load(&self, value: &Value) -> Result<GeoJsonGeometryCollection, ValidationErrors> {
        let map = as_object(value)?;
        let mut errors = ValidationErrors::new();
        check_type(map, GeoJsonGeometryCollection::TYPE, &mut errors);
        let mut geometries = Vec::new();
        if let Some(members) = require(map, "geometries", &mut errors) {
            match members.as_array() {
                Some(members) => {
                    for (i, member) in members.iter().enumerate() {
                        let path = child("geometries", i);
                        if let Some(geometry) = field::load_field(member, &path, &mut errors) {
                            geometries.push(geometry);
                        }
                    }
                }
                None => errors.add("geometries", NOT_A_LIST),
            }
        }
        optional_bbox(map, &mut errors);
        errors.finish(GeoJsonGeometryCollection::from_geometries(geometries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate::{MISSING, UNKNOWN_GEOMETRY, length_must_be, shorter_than};
    use serde_json::json;

    #[test]
    fn test_dispatch_order() {
        let tags: Vec<_> = GEOMETRY_SCHEMAS.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(
            tags,
            [
                "Point",
                "LineString",
                "Polygon",
                "MultiPoint",
                "MultiLineString",
                "MultiPolygon"
            ]
        );
    }

    #[test]
    fn test_point_schema() {
        let point = PointSchema
            .loads(r#"{"type": "Point", "coordinates": [-115.81, 37.24]}"#)
            .unwrap();
        assert_eq!(point.bbox().to_array(), [-115.81, 37.24, -115.81, 37.24]);
        assert_eq!(
            PointSchema.dumps(&point).unwrap(),
            r#"{"type":"Point","coordinates":[-115.81,37.24],"bbox":[-115.81,37.24,-115.81,37.24]}"#
        );
    }

    #[test]
    fn test_point_schema_errors() {
        let errors = PointSchema
            .load(&json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0]}))
            .unwrap_err();
        assert_eq!(errors.messages("coordinates"), &[length_must_be(2)]);

        let errors = PointSchema.load(&json!({"type": "Point"})).unwrap_err();
        assert_eq!(errors.messages("coordinates"), &[MISSING.to_string()]);

        let errors = PointSchema.load(&json!([1.0, 2.0])).unwrap_err();
        assert!(errors.contains(""));
    }

    #[test]
    fn test_tag_mismatch_skips_structure() {
        let errors = PointSchema
            .load(&json!({"type": "LineString", "coordinates": "not a list", "bbox": [0]}))
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["type"]);
        assert_eq!(errors.messages("type"), &["Must be equal to Point.".to_string()]);

        let errors = PolygonSchema.load(&json!({"coordinates": []})).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["type"]);
    }

    #[test]
    fn test_input_bbox_is_replaced() {
        let line = LineStringSchema
            .load(&json!({
                "type": "LineString",
                "coordinates": [[8.919, 44.4074], [8.923, 44.4075]],
                "bbox": [0.0, 0.0, 0.0, 0.0]
            }))
            .unwrap();
        assert_eq!(
            line.bbox().map(|b| b.to_array()),
            Some([8.919, 44.4074, 8.923, 44.4075])
        );
    }

    #[test]
    fn test_foreign_members_are_ignored() {
        let point = PointSchema
            .load(&json!({"type": "Point", "coordinates": [1.0, 2.0], "title": "here"}))
            .unwrap();
        assert_eq!(point.coordinates(), &[1.0, 2.0]);
    }

    #[test]
    fn test_line_string_needs_two_points() {
        let errors = LineStringSchema
            .load(&json!({"type": "LineString", "coordinates": [[1.0, 2.0]]}))
            .unwrap_err();
        assert_eq!(errors.messages("coordinates"), &[shorter_than(2)]);
    }

    #[test]
    fn test_polygon_ring_needs_four_points() {
        let errors = PolygonSchema
            .load(&json!({
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]
            }))
            .unwrap_err();
        assert_eq!(errors.messages("coordinates.0"), &[shorter_than(4)]);
    }

    #[test]
    fn test_self_intersecting_polygon_is_accepted() {
        let bowtie = PolygonSchema
            .load(&json!({
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]]
            }))
            .unwrap();
        assert_eq!(bowtie.bbox().map(|b| b.to_array()), Some([0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_multi_polygon_schema() {
        let polygons = MultiPolygonSchema
            .load(&json!({"type": "MultiPolygon", "coordinates": [
                [[[3.78, 9.28], [-130.91, 1.52], [35.12, 72.234], [3.78, 9.28]]],
                [[[23.18, -34.29], [-1.31, -4.61], [3.41, 77.91], [23.18, -34.29]]]
            ]}))
            .unwrap();
        assert_eq!(
            polygons.bbox().map(|b| b.to_array()),
            Some([-130.91, -34.29, 35.12, 77.91])
        );
    }

    #[test]
    fn test_empty_multi_geometries() {
        let points = MultiPointSchema
            .load(&json!({"type": "MultiPoint", "coordinates": []}))
            .unwrap();
        assert!(points.bbox().is_none());
        assert_eq!(
            MultiPointSchema.dump(&points).unwrap(),
            json!({"type": "MultiPoint", "coordinates": []})
        );
    }

    #[test]
    fn test_load_any() {
        let value = json!({"type": "MultiLineString", "coordinates": [
            [[3.75, 9.25], [-130.95, 1.52]],
            [[23.15, -34.25], [-1.35, -4.65], [3.45, 77.95]]
        ]});
        let lines = load_any(&value).unwrap();
        assert_eq!(lines.type_name(), "MultiLineString");
        assert_eq!(
            lines.bbox().map(|b| b.to_array()),
            Some([-130.95, -34.25, 23.15, 77.95])
        );
        assert!(load_any(&json!({"type": "GeometryCollection", "geometries": []})).is_none());
    }

    #[test]
    fn test_collection_schema_is_strict() {
        let value = json!({"type": "GeometryCollection", "geometries": [
            {"type": "Point", "coordinates": [1.0, 2.0]},
            {"type": "Point", "coordinates": [1.0]},
            {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
        ]});
        let errors = GeometryCollectionSchema.load(&value).unwrap_err();
        assert_eq!(
            errors.messages("geometries.1"),
            &[UNKNOWN_GEOMETRY.to_string()]
        );

        let members = value["geometries"].as_array().unwrap().clone();
        let lenient = GeoJsonGeometryCollection::new(members).unwrap();
        assert_eq!(lenient.len(), 2);
    }

    #[test]
    fn test_collection_schema() {
        let collection = GeometryCollectionSchema
            .load(&json!({"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [1.0, 2.0]},
                {"type": "LineString", "coordinates": [[0.0, 0.0], [3.0, 1.0]]}
            ]}))
            .unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.bbox().map(|b| b.to_array()),
            Some([0.0, 0.0, 3.0, 2.0])
        );

        let errors = GeometryCollectionSchema
            .load(&json!({"type": "GeometryCollection", "geometries": {}}))
            .unwrap_err();
        assert_eq!(errors.messages("geometries"), &[NOT_A_LIST.to_string()]);
    }
}
