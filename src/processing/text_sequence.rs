use log::{debug, info};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::feature::GeoJsonFeature;
use crate::schema::Schema;
use crate::schema::feature::FeatureSchema;
use crate::utils::error::Error;

fn parse_line(line: usize, text: &str) -> Result<Value, Error> {
    serde_json::from_str(text).map_err(|e| Error::InvalidLine {
        line,
        source: Box::new(e.into()),
    })
}

/**
 * Lazily reads a GeoJSON Text Sequence, one JSON value per line.
 *
 * Blank lines are skipped. Errors carry the 1-based line number.
 */
pub fn iter(path: impl AsRef<Path>) -> Result<impl Iterator<Item = Result<Value, Error>>, Error> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(parse_line(i + 1, &text)),
            Err(e) => Some(Err(e.into())),
        }))
}

/// Read every value of a GeoJSON Text Sequence.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Value>, Error> {
    let values = iter(path.as_ref())?.collect::<Result<Vec<_>, _>>()?;
    debug!("Loaded {} values from {}", values.len(), path.as_ref().display());
    Ok(values)
}

/**
 * Writes one compact JSON document per line.
 *
 * # Returns
 * `Some(path)` when anything was written, `None` for an empty input.
 */
pub fn dump<T: Serialize>(items: &[T], path: impl AsRef<Path>) -> Result<Option<PathBuf>, Error> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!("Wrote {} records to {}", items.len(), path.display());
    Ok((!items.is_empty()).then(|| path.to_path_buf()))
}

/// Validate already parsed values as Features, in parallel.
pub fn validate_features(values: &[Value]) -> Result<Vec<GeoJsonFeature>, Error> {
    values
        .par_iter()
        .enumerate()
        .map(|(i, value)| {
            FeatureSchema
                .load(value)
                .map_err(|e| Error::InvalidLine {
                    line: i + 1,
                    source: Box::new(e.into()),
                })
        })
        .collect()
}

/// Read a Text Sequence of Features, validating lines in parallel.
pub fn load_features(path: impl AsRef<Path>) -> Result<Vec<GeoJsonFeature>, Error> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push((i + 1, line));
        }
    }
    let features = lines
        .par_iter()
        .map(|(line, text)| {
            FeatureSchema.loads(text).map_err(|e| Error::InvalidLine {
                line: *line,
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        "Validated {} features from {}",
        features.len(),
        path.as_ref().display()
    );
    Ok(features)
}
