use log::warn;
use serde_json::Value;

use crate::geometry::types::GeoJsonGeometry;
use crate::schema::field::dump_generic;
use crate::schema::geometry::load_any;
use crate::utils::error::Error;

/// Anything that can be handed to the geometry parser.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryInput {
    /// An already validated geometry; returned as is.
    Typed(GeoJsonGeometry),
    /// JSON text holding a geometry mapping.
    Text(String),
    /// A parsed JSON value.
    Json(Value),
}

impl From<GeoJsonGeometry> for GeometryInput {
    fn from(geometry: GeoJsonGeometry) -> Self {
        GeometryInput::Typed(geometry)
    }
}

impl From<&GeoJsonGeometry> for GeometryInput {
    fn from(geometry: &GeoJsonGeometry) -> Self {
        GeometryInput::Typed(geometry.clone())
    }
}

impl From<&str> for GeometryInput {
    fn from(text: &str) -> Self {
        GeometryInput::Text(text.to_string())
    }
}

impl From<String> for GeometryInput {
    fn from(text: String) -> Self {
        GeometryInput::Text(text)
    }
}

impl From<Value> for GeometryInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => GeometryInput::Text(text),
            value => GeometryInput::Json(value),
        }
    }
}

impl From<&Value> for GeometryInput {
    fn from(value: &Value) -> Self {
        GeometryInput::from(value.clone())
    }
}

impl From<geojson::Geometry> for GeometryInput {
    fn from(geometry: geojson::Geometry) -> Self {
        GeometryInput::Json(dump_generic(&geometry).unwrap_or(Value::Null))
    }
}

/// Receives diagnostics about inputs the parser could not recognise.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade at warning level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Classifies untyped payloads into one of the six geometry variants.
///
/// Mappings are offered to the per-type schemas in a fixed order (Point,
/// LineString, Polygon, MultiPoint, MultiLineString, MultiPolygon) and the
/// first one that accepts wins. Unrecognised input is reported to the sink
/// and yields `None`.
#[derive(Debug, Default, Clone)]
pub struct GeometryParser<S = LogSink> {
    sink: S,
}

impl GeometryParser<LogSink> {
    pub fn new() -> Self {
        Self { sink: LogSink }
    }
}

impl<S: DiagnosticSink> GeometryParser<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Parse a single geometry.
    ///
    /// Returns `Err` only when text input is not well-formed JSON.
    pub fn parse_geometry(
        &self,
        input: impl Into<GeometryInput>,
    ) -> Result<Option<GeoJsonGeometry>, Error> {
        match input.into() {
            GeometryInput::Typed(geometry) => Ok(Some(geometry)),
            GeometryInput::Text(text) => {
                let value: Value = serde_json::from_str(&text)?;
                Ok(self.parse_json(&value))
            }
            GeometryInput::Json(value) => Ok(self.parse_json(&value)),
        }
    }

    /// Run the schema cascade over a JSON value.
    pub fn parse_json(&self, value: &Value) -> Option<GeoJsonGeometry> {
        let geometry = match value {
            Value::Object(_) => load_any(value),
            _ => None,
        };
        if geometry.is_none() {
            self.sink.warn(&format!("Unknown geometry: {}", value));
        }
        geometry
    }

    /// Parse every input, dropping the ones that are not geometries.
    pub fn parse_geometries<I, G>(&self, inputs: I) -> Result<Vec<GeoJsonGeometry>, Error>
    where
        I: IntoIterator<Item = G>,
        G: Into<GeometryInput>,
    {
        inputs
            .into_iter()
            .filter_map(|input| self.parse_geometry(input).transpose())
            .collect()
    }
}

/// Parse a single geometry, logging unrecognised input.
pub fn parse_geometry(input: impl Into<GeometryInput>) -> Result<Option<GeoJsonGeometry>, Error> {
    GeometryParser::new().parse_geometry(input)
}

/// Parse a list of geometries, keeping the order of the ones that parse.
pub fn parse_geometries<I, G>(inputs: I) -> Result<Vec<GeoJsonGeometry>, Error>
where
    I: IntoIterator<Item = G>,
    G: Into<GeometryInput>,
{
    GeometryParser::new().parse_geometries(inputs)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::DiagnosticSink;
    use std::sync::Mutex;

    /// Keeps every diagnostic so tests can inspect them.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        pub(crate) fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn warn(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }
}
