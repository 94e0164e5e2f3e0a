use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use thiserror::Error;
use tracing::debug;

use crate::models::{CleanRecord, RawRecord};

/// Columns every input spreadsheet must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "coordinates",
    "facility_name",
    "short_description",
    "long_description",
];

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("failed to open workbook: {0}")]
    Open(String),

    #[error("failed to read worksheet: {0}")]
    Sheet(String),

    #[error("workbook has no worksheets")]
    NoSheets,

    #[error("worksheet has no header row")]
    EmptyHeader,

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
}

/// Read the first worksheet of an Excel file into raw facility records.
pub fn read_facility_workbook(path: &Path) -> Result<Vec<RawRecord>, WorkbookError> {
    let mut workbook: Xlsx<std::io::BufReader<std::fs::File>> =
        open_workbook(path).map_err(|e: calamine::XlsxError| WorkbookError::Open(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(WorkbookError::NoSheets)?
        .map_err(|e| WorkbookError::Sheet(e.to_string()))?;
    records_from_range(&range)
}

/// Extract raw records from a worksheet range.
///
/// The first row is the header; each required column is located by exact
/// (trimmed) name. Data rows may be ragged, missing cells become empty
/// strings.
pub fn records_from_range(range: &Range<Data>) -> Result<Vec<RawRecord>, WorkbookError> {
    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or(WorkbookError::EmptyHeader)?
        .iter()
        .map(cell_text)
        .collect();

    let mut columns = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == name)
            .ok_or(WorkbookError::MissingColumn(name))?;
    }
    let [coord_col, name_col, short_col, long_col] = columns;

    let records: Vec<RawRecord> = rows
        .map(|row| RawRecord {
            coordinates: cell_at(row, coord_col),
            facility_name: cell_at(row, name_col),
            short_description: cell_at(row, short_col),
            long_description: cell_at(row, long_col),
        })
        .collect();

    debug!("Extracted {} data rows from worksheet", records.len());
    Ok(records)
}

/// Read an already-cleaned CSV file back into records for import.
pub fn read_clean_csv(path: &Path) -> Result<Vec<CleanRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    reader
        .deserialize()
        .collect::<Result<Vec<CleanRecord>, _>>()
        .with_context(|| format!("Failed to parse CSV file: {:?}", path))
}

fn cell_at(row: &[Data], col: usize) -> String {
    row.get(col).map(cell_text).unwrap_or_default()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
