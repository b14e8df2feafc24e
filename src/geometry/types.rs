use geo::{
    BoundingRect, Coord, Geometry as GeoRustGeometry, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use crate::schema::field;
use crate::utils::bbox::BoundingBox;

/// An `[x, y]` coordinate pair.
pub type Position = [f64; 2];

fn to_coord(position: &Position) -> Coord<f64> {
    Coord {
        x: position[0],
        y: position[1],
    }
}

fn to_line_string(positions: &[Position]) -> LineString<f64> {
    LineString::new(positions.iter().map(to_coord).collect())
}

// The first ring is the exterior, the rest are holes.
fn to_polygon(rings: &[Vec<Position>]) -> Polygon<f64> {
    let exterior = rings
        .first()
        .map(|ring| to_line_string(ring))
        .unwrap_or_else(|| LineString::new(vec![]));
    let interiors = rings
        .iter()
        .skip(1)
        .map(|ring| to_line_string(ring))
        .collect();
    Polygon::new(exterior, interiors)
}

fn serialize_geometry<S, C>(
    serializer: S,
    type_name: &'static str,
    coordinates: &C,
    bbox: Option<&BoundingBox>,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    C: Serialize + ?Sized,
{
    let len = if bbox.is_some() { 3 } else { 2 };
    let mut state = serializer.serialize_struct(type_name, len)?;
    state.serialize_field("type", type_name)?;
    state.serialize_field("coordinates", coordinates)?;
    if let Some(bbox) = bbox {
        state.serialize_field("bbox", bbox)?;
    }
    state.end()
}

/// A GeoJSON Point in 2D coordinates.
///
/// The bbox of a point is always `[x, y, x, y]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonPoint {
    coordinates: Position,
    bbox: BoundingBox,
    shape: Point<f64>,
}

impl GeoJsonPoint {
    pub const TYPE: &'static str = "Point";

    pub(crate) fn new(coordinates: Position) -> Self {
        let shape = Point::from(to_coord(&coordinates));
        let bbox = BoundingBox::new(shape.bounding_rect());
        Self {
            coordinates,
            bbox,
            shape,
        }
    }

    pub fn x(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn y(&self) -> f64 {
        self.coordinates[1]
    }

    pub fn coordinates(&self) -> &Position {
        &self.coordinates
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn shape(&self) -> &Point<f64> {
        &self.shape
    }
}

impl Serialize for GeoJsonPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_geometry(serializer, Self::TYPE, &self.coordinates, Some(&self.bbox))
    }
}

/// A GeoJSON MultiPoint in 2D coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonMultiPoint {
    coordinates: Vec<Position>,
    bbox: Option<BoundingBox>,
    shape: MultiPoint<f64>,
}

impl GeoJsonMultiPoint {
    pub const TYPE: &'static str = "MultiPoint";

    pub(crate) fn new(coordinates: Vec<Position>) -> Self {
        let shape = MultiPoint::new(
            coordinates
                .iter()
                .map(|position| Point::from(to_coord(position)))
                .collect(),
        );
        let bbox = shape.bounding_rect().map(BoundingBox::new);
        Self {
            coordinates,
            bbox,
            shape,
        }
    }

    pub fn coordinates(&self) -> &[Position] {
        &self.coordinates
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn shape(&self) -> &MultiPoint<f64> {
        &self.shape
    }
}

impl Serialize for GeoJsonMultiPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_geometry(serializer, Self::TYPE, &self.coordinates, self.bbox.as_ref())
    }
}

/// A GeoJSON LineString in 2D coordinates, with at least two positions.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonLineString {
    coordinates: Vec<Position>,
    bbox: Option<BoundingBox>,
    shape: LineString<f64>,
}

impl GeoJsonLineString {
    pub const TYPE: &'static str = "LineString";

    pub(crate) fn new(coordinates: Vec<Position>) -> Self {
        let shape = to_line_string(&coordinates);
        let bbox = shape.bounding_rect().map(BoundingBox::new);
        Self {
            coordinates,
            bbox,
            shape,
        }
    }

    pub fn coordinates(&self) -> &[Position] {
        &self.coordinates
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn shape(&self) -> &LineString<f64> {
        &self.shape
    }
}

impl Serialize for GeoJsonLineString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_geometry(serializer, Self::TYPE, &self.coordinates, self.bbox.as_ref())
    }
}

/// A GeoJSON MultiLineString in 2D coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonMultiLineString {
    coordinates: Vec<Vec<Position>>,
    bbox: Option<BoundingBox>,
    shape: MultiLineString<f64>,
}

impl GeoJsonMultiLineString {
    pub const TYPE: &'static str = "MultiLineString";

    pub(crate) fn new(coordinates: Vec<Vec<Position>>) -> Self {
        let shape = MultiLineString::new(
            coordinates
                .iter()
                .map(|line| to_line_string(line))
                .collect(),
        );
        let bbox = shape.bounding_rect().map(BoundingBox::new);
        Self {
            coordinates,
            bbox,
            shape,
        }
    }

    pub fn coordinates(&self) -> &[Vec<Position>] {
        &self.coordinates
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn shape(&self) -> &MultiLineString<f64> {
        &self.shape
    }
}

impl Serialize for GeoJsonMultiLineString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_geometry(serializer, Self::TYPE, &self.coordinates, self.bbox.as_ref())
    }
}

/// A GeoJSON Polygon in 2D coordinates.
///
/// The first linear ring is the exterior ring and any others are holes.
/// Ring orientation is taken as given.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonPolygon {
    coordinates: Vec<Vec<Position>>,
    bbox: Option<BoundingBox>,
    shape: Polygon<f64>,
}

impl GeoJsonPolygon {
    pub const TYPE: &'static str = "Polygon";

    pub(crate) fn new(coordinates: Vec<Vec<Position>>) -> Self {
        let shape = to_polygon(&coordinates);
        let bbox = shape.bounding_rect().map(BoundingBox::new);
        Self {
            coordinates,
            bbox,
            shape,
        }
    }

    pub fn coordinates(&self) -> &[Vec<Position>] {
        &self.coordinates
    }

    pub fn exterior(&self) -> &[Position] {
        self.coordinates.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holes(&self) -> &[Vec<Position>] {
        self.coordinates.get(1..).unwrap_or(&[])
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn shape(&self) -> &Polygon<f64> {
        &self.shape
    }
}

impl Serialize for GeoJsonPolygon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_geometry(serializer, Self::TYPE, &self.coordinates, self.bbox.as_ref())
    }
}

/// A GeoJSON MultiPolygon in 2D coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonMultiPolygon {
    coordinates: Vec<Vec<Vec<Position>>>,
    bbox: Option<BoundingBox>,
    shape: MultiPolygon<f64>,
}

impl GeoJsonMultiPolygon {
    pub const TYPE: &'static str = "MultiPolygon";

    pub(crate) fn new(coordinates: Vec<Vec<Vec<Position>>>) -> Self {
        let shape = MultiPolygon::new(
            coordinates
                .iter()
                .map(|polygon| to_polygon(polygon))
                .collect(),
        );
        let bbox = shape.bounding_rect().map(BoundingBox::new);
        Self {
            coordinates,
            bbox,
            shape,
        }
    }

    pub fn coordinates(&self) -> &[Vec<Vec<Position>>] {
        &self.coordinates
    }

    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }
}

impl Serialize for GeoJsonMultiPolygon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_geometry(serializer, Self::TYPE, &self.coordinates, self.bbox.as_ref())
    }
}

/// Any one of the six GeoJSON geometry variants.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonGeometry {
    Point(GeoJsonPoint),
    MultiPoint(GeoJsonMultiPoint),
    LineString(GeoJsonLineString),
    MultiLineString(GeoJsonMultiLineString),
    Polygon(GeoJsonPolygon),
    MultiPolygon(GeoJsonMultiPolygon),
}

impl GeoJsonGeometry {
    /// The GeoJSON `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonGeometry::Point(_) => GeoJsonPoint::TYPE,
            GeoJsonGeometry::MultiPoint(_) => GeoJsonMultiPoint::TYPE,
            GeoJsonGeometry::LineString(_) => GeoJsonLineString::TYPE,
            GeoJsonGeometry::MultiLineString(_) => GeoJsonMultiLineString::TYPE,
            GeoJsonGeometry::Polygon(_) => GeoJsonPolygon::TYPE,
            GeoJsonGeometry::MultiPolygon(_) => GeoJsonMultiPolygon::TYPE,
        }
    }

    /// The derived envelope; `None` only for empty multi-geometries.
    pub fn bbox(&self) -> Option<BoundingBox> {
        match self {
            GeoJsonGeometry::Point(g) => Some(*g.bbox()),
            GeoJsonGeometry::MultiPoint(g) => g.bbox().copied(),
            GeoJsonGeometry::LineString(g) => g.bbox().copied(),
            GeoJsonGeometry::MultiLineString(g) => g.bbox().copied(),
            GeoJsonGeometry::Polygon(g) => g.bbox().copied(),
            GeoJsonGeometry::MultiPolygon(g) => g.bbox().copied(),
        }
    }

    /// A copy of the planar shape as a generic geo geometry.
    pub fn shape(&self) -> GeoRustGeometry<f64> {
        match self {
            GeoJsonGeometry::Point(g) => GeoRustGeometry::Point(*g.shape()),
            GeoJsonGeometry::MultiPoint(g) => GeoRustGeometry::MultiPoint(g.shape().clone()),
            GeoJsonGeometry::LineString(g) => GeoRustGeometry::LineString(g.shape().clone()),
            GeoJsonGeometry::MultiLineString(g) => {
                GeoRustGeometry::MultiLineString(g.shape().clone())
            }
            GeoJsonGeometry::Polygon(g) => GeoRustGeometry::Polygon(g.shape().clone()),
            GeoJsonGeometry::MultiPolygon(g) => GeoRustGeometry::MultiPolygon(g.shape().clone()),
        }
    }

    pub fn as_point(&self) -> Option<&GeoJsonPoint> {
        match self {
            GeoJsonGeometry::Point(point) => Some(point),
            _ => None,
        }
    }

    /// The canonical `{type, coordinates, bbox}` mapping.
    pub fn to_value(&self) -> Value {
        let coordinates = match self {
            GeoJsonGeometry::Point(g) => json!(g.coordinates()),
            GeoJsonGeometry::MultiPoint(g) => json!(g.coordinates()),
            GeoJsonGeometry::LineString(g) => json!(g.coordinates()),
            GeoJsonGeometry::MultiLineString(g) => json!(g.coordinates()),
            GeoJsonGeometry::Polygon(g) => json!(g.coordinates()),
            GeoJsonGeometry::MultiPolygon(g) => json!(g.coordinates()),
        };
        let mut value = json!({
            "type": self.type_name(),
            "coordinates": coordinates,
        });
        if let (Some(bbox), Value::Object(map)) = (self.bbox(), &mut value) {
            map.insert("bbox".to_string(), json!(bbox.to_vec()));
        }
        value
    }
}

impl From<GeoJsonPoint> for GeoJsonGeometry {
    fn from(value: GeoJsonPoint) -> Self {
        GeoJsonGeometry::Point(value)
    }
}

impl From<GeoJsonMultiPoint> for GeoJsonGeometry {
    fn from(value: GeoJsonMultiPoint) -> Self {
        GeoJsonGeometry::MultiPoint(value)
    }
}

impl From<GeoJsonLineString> for GeoJsonGeometry {
    fn from(value: GeoJsonLineString) -> Self {
        GeoJsonGeometry::LineString(value)
    }
}

impl From<GeoJsonMultiLineString> for GeoJsonGeometry {
    fn from(value: GeoJsonMultiLineString) -> Self {
        GeoJsonGeometry::MultiLineString(value)
    }
}

impl From<GeoJsonPolygon> for GeoJsonGeometry {
    fn from(value: GeoJsonPolygon) -> Self {
        GeoJsonGeometry::Polygon(value)
    }
}

impl From<GeoJsonMultiPolygon> for GeoJsonGeometry {
    fn from(value: GeoJsonMultiPolygon) -> Self {
        GeoJsonGeometry::MultiPolygon(value)
    }
}

impl Serialize for GeoJsonGeometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GeoJsonGeometry::Point(g) => g.serialize(serializer),
            GeoJsonGeometry::MultiPoint(g) => g.serialize(serializer),
            GeoJsonGeometry::LineString(g) => g.serialize(serializer),
            GeoJsonGeometry::MultiLineString(g) => g.serialize(serializer),
            GeoJsonGeometry::Polygon(g) => g.serialize(serializer),
            GeoJsonGeometry::MultiPolygon(g) => g.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for GeoJsonGeometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        field::deserialize(deserializer)
    }
}
