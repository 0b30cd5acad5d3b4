use csv::{ReaderBuilder, StringRecord};
use std::io::Read;

use crate::error::{Error, Result};

/// Cell values read as missing, matching the pandas default NA set.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column projection of a CSV source.
///
/// Resolves the required column names against the header once, then pulls
/// just those cells out of every record.
pub struct Projection {
    source_name: String,
    indices: Vec<usize>,
}

impl Projection {
    pub fn resolve(source_name: &str, headers: &StringRecord, columns: &[&str]) -> Result<Self> {
        let indices = columns
            .iter()
            .map(|column| {
                headers
                    .iter()
                    .position(|h| h.trim() == *column)
                    .ok_or_else(|| Error::malformed_source(source_name, column))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source_name: source_name.to_string(),
            indices,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn project(&self, record: &StringRecord) -> Vec<Option<String>> {
        self.indices
            .iter()
            .map(|&idx| record.get(idx).and_then(cell_value))
            .collect()
    }
}

/// Read a headed CSV source and project every row onto `columns`.
///
/// Cells come back in the order of `columns`. Fails with `MalformedSource`
/// when a column is absent from the header.
pub fn read_projected<R: Read>(
    source_name: &str,
    reader: R,
    columns: &[&str],
) -> Result<Vec<Vec<Option<String>>>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();
    let projection = Projection::resolve(source_name, &headers, columns)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(projection.project(&record?));
    }

    tracing::debug!("Read {} rows from {}", rows.len(), projection.source_name());
    Ok(rows)
}

pub fn cell_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Integer value of `raw`, also accepting integral float literals such as
/// `8.0`. Floats outside the `i64` range are rejected rather than saturated.
fn parse_integral(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }

    match raw.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Some(value as i64)
        }
        _ => None,
    }
}

/// Canonical form of a candidate identifier: `1.0` and `1` name the same
/// candidate. Non-numeric identifiers are kept as they are.
pub fn normalize_id(raw: String) -> String {
    match parse_integral(&raw) {
        Some(value) => value.to_string(),
        None => raw,
    }
}

/// Parse an integer score. Accepts integral float literals such as `8.0`.
pub fn parse_score(source_name: &str, row: usize, raw: &str) -> Result<i64> {
    match parse_integral(raw) {
        Some(value) => Ok(value),
        None => Err(Error::Parse(format!(
            "{}: row {} has non-integer score '{}'",
            source_name, row, raw
        ))),
    }
}
