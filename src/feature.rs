use geo::Geometry as GeoRustGeometry;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::geometry::types::GeoJsonGeometry;
use crate::parse::{DiagnosticSink, GeometryInput, GeometryParser};
use crate::schema::Schema;
use crate::schema::feature::{FeatureCollectionSchema, FeatureSchema};
use crate::utils::bbox::BoundingBox;
use crate::utils::error::Error;

/// A GeoJSON Feature with a mandatory geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonFeature {
    id: Option<String>,
    geometry: GeoJsonGeometry,
    properties: Map<String, Value>,
    bbox: Option<BoundingBox>,
}

impl GeoJsonFeature {
    pub const TYPE: &'static str = "Feature";

    /// Build a feature from any geometry input.
    ///
    /// Fails with `Error::Json` for malformed text and with
    /// `Error::UnknownGeometry` when the input is not a geometry.
    pub fn new(
        geometry: impl Into<GeometryInput>,
        properties: Map<String, Value>,
        id: Option<String>,
    ) -> Result<Self, Error> {
        Self::with_parser(&GeometryParser::new(), geometry, properties, id)
    }

    pub fn with_parser<S: DiagnosticSink>(
        parser: &GeometryParser<S>,
        geometry: impl Into<GeometryInput>,
        properties: Map<String, Value>,
        id: Option<String>,
    ) -> Result<Self, Error> {
        let geometry = parser
            .parse_geometry(geometry)?
            .ok_or(Error::UnknownGeometry)?;
        Ok(Self::from_parts(geometry, properties, id))
    }

    pub(crate) fn from_parts(
        geometry: GeoJsonGeometry,
        properties: Map<String, Value>,
        id: Option<String>,
    ) -> Self {
        let bbox = geometry.bbox();
        Self {
            id,
            geometry,
            properties,
            bbox,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn geometry(&self) -> &GeoJsonGeometry {
        &self.geometry
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Envelope of the geometry.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn shape(&self) -> GeoRustGeometry<f64> {
        self.geometry.shape()
    }

    /// This feature with `key` set to `value`.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl Serialize for GeoJsonFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.id.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct(Self::TYPE, len)?;
        state.serialize_field("type", Self::TYPE)?;
        if let Some(id) = &self.id {
            state.serialize_field("id", id)?;
        }
        state.serialize_field("geometry", &self.geometry)?;
        state.serialize_field("properties", &self.properties)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for GeoJsonFeature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FeatureSchema.load(&value).map_err(serde::de::Error::custom)
    }
}

/// An ordered list of features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoJsonFeatureCollection {
    features: Vec<GeoJsonFeature>,
}

impl GeoJsonFeatureCollection {
    pub const TYPE: &'static str = "FeatureCollection";

    pub fn new(features: Vec<GeoJsonFeature>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[GeoJsonFeature] {
        &self.features
    }

    pub fn into_features(self) -> Vec<GeoJsonFeature> {
        self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The planar shape of every feature, in order.
    pub fn shapes(&self) -> Vec<GeoRustGeometry<f64>> {
        self.features.iter().map(GeoJsonFeature::shape).collect()
    }
}

impl FromIterator<GeoJsonFeature> for GeoJsonFeatureCollection {
    fn from_iter<I: IntoIterator<Item = GeoJsonFeature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for GeoJsonFeatureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct(Self::TYPE, 2)?;
        state.serialize_field("type", Self::TYPE)?;
        state.serialize_field("features", &self.features)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for GeoJsonFeatureCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FeatureCollectionSchema
            .load(&value)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::testing::RecordingSink;
    use geo::Point;
    use serde_json::json;

    const STATIONS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/stations.geojson");

    #[test]
    fn test_new_feature() {
        let feature = GeoJsonFeature::new(
            json!({"type": "Point", "coordinates": [-120.566673, 37.366669]}),
            Map::new(),
            Some("KMER".to_string()),
        )
        .unwrap();
        assert_eq!(feature.id(), Some("KMER"));
        assert_eq!(feature.geometry().type_name(), "Point");
        assert_eq!(
            feature.shape(),
            GeoRustGeometry::Point(Point::new(-120.566673, 37.366669))
        );
    }

    #[test]
    fn test_new_feature_needs_a_geometry() {
        let result = GeoJsonFeature::new(json!({"type": "Circle"}), Map::new(), None);
        assert!(matches!(result, Err(Error::UnknownGeometry)));
        let result = GeoJsonFeature::new("{broken", Map::new(), None);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_new_feature_reports_to_the_sink() {
        let parser = GeometryParser::with_sink(RecordingSink::default());
        let result = GeoJsonFeature::with_parser(
            &parser,
            json!({"type": "Point", "coordinates": "here"}),
            Map::new(),
            None,
        );
        assert!(matches!(result, Err(Error::UnknownGeometry)));
        assert_eq!(parser.sink().messages().len(), 1);

        let feature = GeoJsonFeature::with_parser(
            &parser,
            r#"{"type": "Point", "coordinates": [3.0, 4.0]}"#,
            Map::new(),
            Some("p".to_string()),
        )
        .unwrap();
        assert_eq!(feature.bbox().map(|b| b.to_array()), Some([3.0, 4.0, 3.0, 4.0]));
        assert_eq!(parser.sink().messages().len(), 1);
    }

    #[test]
    fn test_feature_serialization() {
        let feature = GeoJsonFeature::new(
            json!({"type": "Point", "coordinates": [1.0, 2.0]}),
            Map::new(),
            None,
        )
        .unwrap()
        .with_property("name", "somewhere");
        assert_eq!(
            serde_json::to_string(&feature).unwrap(),
            r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0],"bbox":[1.0,2.0,1.0,2.0]},"properties":{"name":"somewhere"}}"#
        );
        let loaded: GeoJsonFeature = serde_json::from_value(serde_json::to_value(&feature).unwrap()).unwrap();
        assert_eq!(loaded, feature);
    }

    #[test]
    fn test_with_property_keeps_geometry() {
        let feature = GeoJsonFeature::new(
            json!({"type": "LineString", "coordinates": [[0.0, 0.0], [2.0, 1.0]]}),
            Map::new(),
            None,
        )
        .unwrap();
        let bbox = feature.bbox().copied();
        let feature = feature.with_property("length", 2.24);
        assert_eq!(feature.property("length"), Some(&json!(2.24)));
        assert_eq!(feature.bbox().copied(), bbox);
    }

    #[test]
    fn test_deserialize_validates() {
        let result: Result<GeoJsonFeature, _> =
            serde_json::from_str(r#"{"type": "Feature", "properties": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_stations() {
        let text = std::fs::read_to_string(STATIONS).unwrap();
        let collection: GeoJsonFeatureCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(collection.len(), 2);
        let ids: Vec<_> = collection
            .features()
            .iter()
            .map(|f| f.property("stid").and_then(Value::as_str))
            .collect();
        assert_eq!(ids, [Some("KBUR"), Some("KMER")]);
        assert_eq!(
            collection.shapes(),
            vec![
                GeoRustGeometry::Point(Point::new(-118.365379, 34.199669)),
                GeoRustGeometry::Point(Point::new(-120.566673, 37.366669)),
            ]
        );
    }

    #[test]
    fn test_collection_serialization() {
        let collection: GeoJsonFeatureCollection = vec![
            GeoJsonFeature::new(
                json!({"type": "Point", "coordinates": [1.0, 2.0]}),
                Map::new(),
                Some("a".to_string()),
            )
            .unwrap(),
        ]
        .into_iter()
        .collect();
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["id"], "a");
        assert!(value.get("bbox").is_none());
    }
}
