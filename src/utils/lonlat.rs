use geo::{Coord, Intersects, Point, Rect};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::error::Error;

pub const WGS84_BBOX: [f64; 4] = [
    -180.0, // Min longitude
    -90.0,  // Min latitude
    180.0,  // Max longitude
    90.0,   // Max latitude
];

/// Trait for checking if a geographic coordinate is within a specific bounding box.
pub trait InBoundingBox {
    /// Checks if the coordinate is within the specified bounding box,
    /// boundary included.
    fn in_bounding_box(&self, bbox: &[f64; 4]) -> bool;
}

fn bbox_rect(bbox: &[f64; 4]) -> Rect {
    Rect::new(
        Coord { x: bbox[0], y: bbox[1] },
        Coord { x: bbox[2], y: bbox[3] },
    )
}

impl InBoundingBox for Point {
    fn in_bounding_box(&self, bbox: &[f64; 4]) -> bool {
        self.intersects(&bbox_rect(bbox))
    }
}

impl InBoundingBox for [f64; 2] {
    fn in_bounding_box(&self, bbox: &[f64; 4]) -> bool {
        Point::new(self[0], self[1]).in_bounding_box(bbox)
    }
}

/// Wrap a longitude into [-180, 180].
pub fn wrap_longitude(lon: f64) -> f64 {
    let lon = lon.rem_euclid(360.0);
    if lon > 180.0 { lon - 360.0 } else { lon }
}

/// The point for `(lon, lat)` if it lies inside the WGS84 bounds.
///
/// With `wrap`, the longitude is first moved into [-180, 180).
pub fn valid_lonlat(lon: f64, lat: f64, wrap: bool) -> Option<Point> {
    let lon = if wrap {
        let lon = lon.rem_euclid(360.0);
        if lon >= 180.0 { lon - 360.0 } else { lon }
    } else {
        lon
    };
    let point = Point::new(lon, lat);
    point.in_bounding_box(&WGS84_BBOX).then_some(point)
}

pub fn validate_latitude(lat: f64) -> Result<f64, Error> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(lat)
    } else {
        Err(Error::OutOfRange(
            "latitude must be [-90.0, 90.0]".to_string(),
        ))
    }
}

pub fn validate_longitude(lon: f64) -> Result<f64, Error> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(lon)
    } else {
        Err(Error::OutOfRange(
            "longitude must be [-180.0, 180.0]".to_string(),
        ))
    }
}

/// WGS84 longitude and latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LonLat {
    longitude: f64,
    latitude: f64,
}

impl LonLat {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, Error> {
        Ok(Self {
            longitude: validate_longitude(longitude)?,
            latitude: validate_latitude(latitude)?,
        })
    }

    pub fn lon(&self) -> f64 {
        self.longitude
    }

    pub fn lat(&self) -> f64 {
        self.latitude
    }

    /// The `[longitude, latitude]` coordinates.
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    pub fn is_valid(&self) -> bool {
        self.point().in_bounding_box(&WGS84_BBOX)
    }
}

impl<'de> Deserialize<'de> for LonLat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            longitude: f64,
            latitude: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        LonLat::new(raw.longitude, raw.latitude).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert_eq!(wrap_longitude(540.0), 180.0);
        assert_eq!(wrap_longitude(-122.5), -122.5);
    }

    #[test]
    fn test_valid_lonlat() {
        assert_eq!(valid_lonlat(-122.0, 37.0, false), Some(Point::new(-122.0, 37.0)));
        assert_eq!(valid_lonlat(180.0, 90.0, false), Some(Point::new(180.0, 90.0)));
        assert_eq!(valid_lonlat(181.0, 0.0, false), None);
        assert_eq!(valid_lonlat(0.0, -90.5, false), None);
    }

    #[test]
    fn test_valid_lonlat_with_wrap() {
        assert_eq!(valid_lonlat(181.0, 0.0, true), Some(Point::new(-179.0, 0.0)));
        assert_eq!(valid_lonlat(180.0, 0.0, true), Some(Point::new(-180.0, 0.0)));
        assert_eq!(valid_lonlat(10.0, 91.0, true), None);
    }

    #[test]
    fn test_validate_ranges() {
        assert_eq!(validate_latitude(-90.0).unwrap(), -90.0);
        assert!(matches!(validate_latitude(90.1), Err(Error::OutOfRange(_))));
        assert_eq!(validate_longitude(180.0).unwrap(), 180.0);
        assert!(matches!(validate_longitude(-180.1), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn test_lonlat() {
        let lonlat = LonLat::new(-122.395556, 37.793871).unwrap();
        assert_eq!(lonlat.coordinates(), [-122.395556, 37.793871]);
        assert_eq!(lonlat.point(), Point::new(-122.395556, 37.793871));
        assert!(lonlat.is_valid());
        assert!(LonLat::new(200.0, 0.0).is_err());
    }

    #[test]
    fn test_lonlat_deserialize_validates() {
        let lonlat: LonLat =
            serde_json::from_str(r#"{"longitude": -122.395556, "latitude": 37.793871}"#).unwrap();
        assert_eq!(lonlat.lon(), -122.395556);
        assert_eq!(lonlat.lat(), 37.793871);

        let result: Result<LonLat, _> =
            serde_json::from_str(r#"{"longitude": 0.0, "latitude": 95.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_in_bounding_box() {
        let bbox = [5.866211, 47.270111, 15.013611, 55.058333];
        assert!([10.0, 50.0].in_bounding_box(&bbox));
        assert!(![4.0, 50.0].in_bounding_box(&bbox));
    }
}
