use std::path::Path;

use anyhow::{Context, Result};

use crate::models::CleanRecord;

const CSV_HEADER: [&str; 5] = [
    "facility_name",
    "lat",
    "lon",
    "short_description",
    "long_description",
];

/// Write cleaned records to a CSV file.
///
/// The header row comes from the [`CleanRecord`] field names; no index
/// column is emitted. Row order is preserved. A file with no valid rows
/// still gets a header.
pub fn write_clean_csv(records: &[CleanRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    if records.is_empty() {
        // serialize() only emits the header alongside a first record.
        writer
            .write_record(CSV_HEADER)
            .context("Failed to write CSV header")?;
    }
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record: {}", record.facility_name))?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}
