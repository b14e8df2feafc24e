use geo::Point;
use log::debug;
use s2::cellid::CellID;
use s2::latlng::LatLng;

use crate::feature::{GeoJsonFeature, GeoJsonFeatureCollection};
use crate::utils::error::Error;
use crate::utils::lonlat::LonLat;

/// Leaf cell level.
pub const DEFAULT_S2_LEVEL: u64 = 30;

/// Property added by [`GeoJsonFeatureCollection::with_s2_cell_tokens`].
pub const S2_CELL_PROPERTY: &str = "s2_cell_id";

/// The cell at `level` containing `(lon, lat)`; levels at or above 30
/// give the leaf cell.
pub fn s2_cell_id(lon: f64, lat: f64, level: u64) -> CellID {
    let cell = CellID::from(&LatLng::from_degrees(lat, lon));
    if level < cell.level() {
        cell.parent(level)
    } else {
        cell
    }
}

pub fn s2_cell_token(lon: f64, lat: f64, level: u64) -> String {
    s2_cell_id(lon, lat, level).to_token()
}

pub fn point_to_s2_cell_id(point: &Point, level: u64) -> CellID {
    s2_cell_id(point.x(), point.y(), level)
}

pub fn point_to_s2_cell_token(point: &Point, level: u64) -> String {
    s2_cell_token(point.x(), point.y(), level)
}

/// Cell tokens for a stream of points, computed as the iterator advances.
pub fn points_to_s2_cell_tokens<I>(points: I, level: u64) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = Point>,
{
    points
        .into_iter()
        .map(move |point| point_to_s2_cell_token(&point, level))
}

/// A cell given as an id, its raw 64-bit value or its token.
#[derive(Debug, Clone, PartialEq)]
pub enum S2CellInput {
    Id(CellID),
    Raw(u64),
    Token(String),
}

impl From<CellID> for S2CellInput {
    fn from(cell: CellID) -> Self {
        S2CellInput::Id(cell)
    }
}

impl From<u64> for S2CellInput {
    fn from(raw: u64) -> Self {
        S2CellInput::Raw(raw)
    }
}

impl From<&str> for S2CellInput {
    fn from(token: &str) -> Self {
        S2CellInput::Token(token.to_string())
    }
}

impl From<String> for S2CellInput {
    fn from(token: String) -> Self {
        S2CellInput::Token(token)
    }
}

/// Center of a cell in degrees.
pub fn s2_cell_to_lon_lat(cell: impl Into<S2CellInput>) -> Result<LonLat, Error> {
    let (cell, label) = match cell.into() {
        S2CellInput::Id(cell) => (cell, cell.0.to_string()),
        S2CellInput::Raw(raw) => (CellID(raw), raw.to_string()),
        S2CellInput::Token(token) => (CellID::from_token(&token), token),
    };
    if !cell.is_valid() {
        return Err(Error::InvalidCell(label));
    }
    let center = LatLng::from(&cell);
    LonLat::new(center.lng.deg(), center.lat.deg())
}

impl GeoJsonFeatureCollection {
    /// Tag every Point feature with the token of its cell at `level`.
    pub fn with_s2_cell_tokens(self, level: u64) -> Self {
        self.into_features()
            .into_iter()
            .map(|feature| tag_feature(feature, level))
            .collect()
    }
}

fn tag_feature(feature: GeoJsonFeature, level: u64) -> GeoJsonFeature {
    match feature.geometry().as_point().map(|point| *point.shape()) {
        Some(point) => {
            feature.with_property(S2_CELL_PROPERTY, point_to_s2_cell_token(&point, level))
        }
        None => {
            debug!(
                "Skipping cell token for {} feature {:?}",
                feature.geometry().type_name(),
                feature.id()
            );
            feature
        }
    }
}
