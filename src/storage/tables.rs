use csv::{Reader, Writer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::models::{FeatureMatrix, JoinedRow};

/// Columns of the intermediate joined table, in file order.
pub const JOINED_COLUMNS: &[&str] = &[
    "status",
    "candidate_id",
    "main_technology",
    "seniority_level",
    "english_level",
    "subjective_readiness_avg",
];

pub fn write_joined<P: AsRef<Path>>(rows: &[JoinedRow], path: P) -> Result<()> {
    let mut writer = Writer::from_writer(Vec::new());
    // Header written explicitly so an empty table still carries its schema.
    writer.write_record(JOINED_COLUMNS)?;
    let mut writer = write_joined_rows(writer, rows)?;
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;

    replace_file(path.as_ref(), &bytes)?;
    tracing::info!("Wrote {} joined rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}

fn write_joined_rows<W: Write>(mut writer: Writer<W>, rows: &[JoinedRow]) -> Result<Writer<W>> {
    for row in rows {
        writer.write_record([
            row.status.as_deref().unwrap_or(""),
            row.candidate_id.as_deref().unwrap_or(""),
            row.main_technology.as_deref().unwrap_or(""),
            row.seniority_level.as_deref().unwrap_or(""),
            row.english_level.as_deref().unwrap_or(""),
            row.subjective_readiness_avg.to_string().as_str(),
        ])?;
    }
    Ok(writer)
}

pub fn read_joined<P: AsRef<Path>>(path: P) -> Result<Vec<JoinedRow>> {
    let file = File::open(path.as_ref())?;
    let rows = read_joined_from(file)?;
    tracing::info!("Read {} joined rows from {}", rows.len(), path.as_ref().display());
    Ok(rows)
}

pub fn read_joined_from<R: Read>(reader: R) -> Result<Vec<JoinedRow>> {
    let mut reader = Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    for column in JOINED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(Error::malformed_source("joined", column));
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: JoinedRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write the matrix with a header of column ids.
///
/// The file is staged next to its destination and renamed into place, so a
/// failed run leaves any previous matrix intact.
pub fn write_matrix<P: AsRef<Path>>(matrix: &FeatureMatrix, path: P) -> Result<()> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(&matrix.columns)?;
    for row in &matrix.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;

    replace_file(path.as_ref(), &bytes)?;
    tracing::info!(
        "Wrote feature matrix {}x{} to {}",
        matrix.len(),
        matrix.columns.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<FeatureMatrix> {
    let mut reader = Reader::from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut matrix = FeatureMatrix::new(columns);

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let values = record
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|e| {
                    Error::Parse(format!("feature matrix row {}: '{}' ({})", i + 1, cell, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        matrix.rows.push(values);
    }

    Ok(matrix)
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
