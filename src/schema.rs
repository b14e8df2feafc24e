//! Validating loaders for GeoJSON mappings.
//!
//! Every schema checks a `serde_json::Value` field by field, collecting
//! errors into [`ValidationErrors`], and builds the typed value on success.

pub mod feature;
pub mod field;
pub mod geometry;
pub mod validate;

use serde::Serialize;
use serde_json::Value;

use crate::utils::error::{Error, ValidationErrors};

pub trait Schema {
    type Output: Serialize;

    /// Validate a parsed mapping and build the typed value.
    fn load(&self, value: &Value) -> Result<Self::Output, ValidationErrors>;

    /// Parse JSON text, then [`Schema::load`] it.
    fn loads(&self, text: &str) -> Result<Self::Output, Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(self.load(&value)?)
    }

    /// The canonical mapping form.
    fn dump(&self, output: &Self::Output) -> Result<Value, Error> {
        Ok(serde_json::to_value(output)?)
    }

    fn dumps(&self, output: &Self::Output) -> Result<String, Error> {
        Ok(serde_json::to_string(output)?)
    }
}
