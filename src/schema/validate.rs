//! Field checks shared by the schemas.
//!
//! The helpers record problems in a [`ValidationErrors`] under the dotted
//! path of the offending field and return `None`, so a schema can keep going
//! and report every error it finds.

use serde_json::{Map, Value};

use crate::geometry::types::Position;
use crate::utils::error::ValidationErrors;

pub const MISSING: &str = "Missing data for required field.";
pub const NULL: &str = "Field may not be null.";
pub const NOT_A_LIST: &str = "Not a valid list.";
pub const NOT_A_NUMBER: &str = "Not a valid number.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_A_MAPPING: &str = "Not a valid mapping type.";
pub const INVALID_INPUT: &str = "Invalid input type.";
pub const UNKNOWN_GEOMETRY: &str = "Unknown geometry data.";

pub fn must_equal(expected: &str) -> String {
    format!("Must be equal to {expected}.")
}

pub fn length_must_be(len: usize) -> String {
    format!("Length must be {len}.")
}

pub fn shorter_than(min: usize) -> String {
    format!("Shorter than minimum length {min}.")
}

/// Dotted path of a list element or nested field.
pub fn child(path: &str, key: impl std::fmt::Display) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// The mapping behind `value`, or an error on the root field.
pub fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    value
        .as_object()
        .ok_or_else(|| ValidationErrors::single("", INVALID_INPUT))
}

/// A required, non-null field.
pub fn require<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Value> {
    match map.get(field) {
        None => {
            errors.add(field, MISSING);
            None
        }
        Some(Value::Null) => {
            errors.add(field, NULL);
            None
        }
        Some(value) => Some(value),
    }
}

/// Check the `type` tag against `expected`, exact and case-sensitive.
pub fn check_type(map: &Map<String, Value>, expected: &str, errors: &mut ValidationErrors) {
    if let Some(value) = require(map, "type", errors) {
        match value.as_str() {
            Some(tag) if tag == expected => {}
            Some(_) => errors.add("type", must_equal(expected)),
            None => errors.add("type", NOT_A_STRING),
        }
    }
}

/// Any JSON number; integers are widened to `f64`.
pub fn number(value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<f64> {
    let number = value.as_f64();
    if number.is_none() {
        errors.add(path, NOT_A_NUMBER);
    }
    number
}

/// Validate a list, running `item` on every element.
///
/// All elements are checked even after a failure.
pub fn list_of<T, F>(
    value: &Value,
    path: &str,
    min_len: usize,
    errors: &mut ValidationErrors,
    item: F,
) -> Option<Vec<T>>
where
    F: Fn(&Value, &str, &mut ValidationErrors) -> Option<T>,
{
    let Some(values) = value.as_array() else {
        errors.add(path, NOT_A_LIST);
        return None;
    };
    if values.len() < min_len {
        errors.add(path, shorter_than(min_len));
        return None;
    }
    let mut items = Vec::with_capacity(values.len());
    let mut valid = true;
    for (i, value) in values.iter().enumerate() {
        match item(value, &child(path, i), errors) {
            Some(parsed) if valid => items.push(parsed),
            Some(_) => {}
            None => valid = false,
        }
    }
    valid.then_some(items)
}

/// Exactly two numbers.
pub fn position(value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<Position> {
    let Some(values) = value.as_array() else {
        errors.add(path, NOT_A_LIST);
        return None;
    };
    if values.len() != 2 {
        errors.add(path, length_must_be(2));
        return None;
    }
    let x = number(&values[0], &child(path, 0), errors);
    let y = number(&values[1], &child(path, 1), errors);
    Some([x?, y?])
}

pub fn positions(
    value: &Value,
    path: &str,
    min_len: usize,
    errors: &mut ValidationErrors,
) -> Option<Vec<Position>> {
    list_of(value, path, min_len, errors, position)
}

/// Lines of at least two positions each.
pub fn lines(value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<Vec<Vec<Position>>> {
    list_of(value, path, 0, errors, |line, path, errors| {
        positions(line, path, 2, errors)
    })
}

/// At least one ring of at least four positions each.
pub fn rings(value: &Value, path: &str, errors: &mut ValidationErrors) -> Option<Vec<Vec<Position>>> {
    list_of(value, path, 1, errors, |ring, path, errors| {
        positions(ring, path, 4, errors)
    })
}

pub fn polygons(
    value: &Value,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<Vec<Vec<Vec<Position>>>> {
    list_of(value, path, 0, errors, rings)
}

/// Check an input `bbox` when one is given; its values are discarded.
pub fn optional_bbox(map: &Map<String, Value>, errors: &mut ValidationErrors) {
    match map.get("bbox") {
        None | Some(Value::Null) => {}
        Some(value) => {
            list_of(value, "bbox", 4, errors, number);
        }
    }
}
