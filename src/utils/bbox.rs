use geo::{Coord, Intersects, Rect};
use rstar::{AABB, RTreeObject};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::ops::Deref;

/// Axis-aligned envelope `[minX, minY, maxX, maxY]` of a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox(Rect<f64>);

impl BoundingBox {
    /// Construct a new BoundingBox from a geo::Rect.
    pub fn new(rect: Rect<f64>) -> Self {
        Self(rect)
    }

    /// Convenience constructor from corner coordinates.
    pub fn from_corners(min: (f64, f64), max: (f64, f64)) -> Self {
        Self(Rect::new(min, max))
    }

    /// Build from the GeoJSON `[minX, minY, maxX, maxY]` ordering.
    pub fn from_array(bbox: [f64; 4]) -> Self {
        Self::from_corners((bbox[0], bbox[1]), (bbox[2], bbox[3]))
    }

    pub fn min_x(&self) -> f64 {
        self.0.min().x
    }

    pub fn min_y(&self) -> f64 {
        self.0.min().y
    }

    pub fn max_x(&self) -> f64 {
        self.0.max().x
    }

    pub fn max_y(&self) -> f64 {
        self.0.max().y
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x(), self.min_y(), self.max_x(), self.max_y()]
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox(Rect::new(
            Coord {
                x: self.min_x().min(other.min_x()),
                y: self.min_y().min(other.min_y()),
            },
            Coord {
                x: self.max_x().max(other.max_x()),
                y: self.max_y().max(other.max_y()),
            },
        ))
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.0.intersects(&other.0)
    }

    /// Convert to geo::Rect<f64>
    pub fn to_geo_rect(&self) -> Rect<f64> {
        self.0
    }
}

/// Union of all boxes, `None` when the iterator is empty.
pub fn union_all<'a, I>(boxes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    boxes
        .into_iter()
        .fold(None, |acc: Option<BoundingBox>, bbox| match acc {
            Some(acc) => Some(acc.union(bbox)),
            None => Some(*bbox),
        })
}

/// Conversion from geo::Rect<f64> to BoundingBox.
impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        BoundingBox(rect)
    }
}

/// Conversion from BoundingBox to geo::Rect<f64>.
impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        bbox.0
    }
}

/// Allowing access to the inner Rect methods directly.
impl Deref for BoundingBox {
    type Target = Rect<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        for value in self.to_array() {
            seq.serialize_element(&value)?;
        }
        seq.end()
    }
}

/// Allow the BoundingBox to be used as an RTreeObject
impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x(), self.min_y()], [self.max_x(), self.max_y()])
    }
}

/// A bounding box tagged with the index of the item it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBoxWithId(pub BoundingBox, pub usize);

impl RTreeObject for BoundingBoxWithId {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.0.envelope()
    }
}
