use geo::{BoundingRect, GeometryCollection};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::geometry::types::GeoJsonGeometry;
use crate::parse::{DiagnosticSink, GeometryInput, GeometryParser};
use crate::schema::Schema;
use crate::schema::geometry::GeometryCollectionSchema;
use crate::utils::bbox::BoundingBox;
use crate::utils::error::Error;

/// A GeoJSON GeometryCollection of the six simple geometry types.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonGeometryCollection {
    geometries: Vec<GeoJsonGeometry>,
    bbox: Option<BoundingBox>,
    shape: GeometryCollection<f64>,
}

impl GeoJsonGeometryCollection {
    pub const TYPE: &'static str = "GeometryCollection";

    /// Build a collection from typed geometries, JSON text or parsed values.
    ///
    /// Members are parsed leniently: anything that is not a recognisable
    /// geometry is logged and dropped. Malformed JSON text is an error.
    pub fn new<I, G>(geometries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = G>,
        G: Into<GeometryInput>,
    {
        Self::with_parser(&GeometryParser::new(), geometries)
    }

    /// Like [`new`](Self::new), reporting dropped members to `parser`'s sink.
    pub fn with_parser<S, I, G>(parser: &GeometryParser<S>, geometries: I) -> Result<Self, Error>
    where
        S: DiagnosticSink,
        I: IntoIterator<Item = G>,
        G: Into<GeometryInput>,
    {
        Ok(Self::from_geometries(parser.parse_geometries(geometries)?))
    }

    pub(crate) fn from_geometries(geometries: Vec<GeoJsonGeometry>) -> Self {
        let shape: GeometryCollection<f64> =
            geometries.iter().map(GeoJsonGeometry::shape).collect();
        let bbox = shape.bounding_rect().map(BoundingBox::new);
        Self {
            geometries,
            bbox,
            shape,
        }
    }

    pub fn geometries(&self) -> &[GeoJsonGeometry] {
        &self.geometries
    }

    pub fn into_geometries(self) -> Vec<GeoJsonGeometry> {
        self.geometries
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Envelope over every member, `None` for an empty collection.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn shape(&self) -> &GeometryCollection<f64> {
        &self.shape
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for GeoJsonGeometryCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.bbox.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct(Self::TYPE, len)?;
        state.serialize_field("type", Self::TYPE)?;
        state.serialize_field("geometries", &self.geometries)?;
        if let Some(bbox) = &self.bbox {
            state.serialize_field("bbox", bbox)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for GeoJsonGeometryCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        GeometryCollectionSchema
            .load(&value)
            .map_err(serde::de::Error::custom)
    }
}
