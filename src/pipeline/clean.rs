use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::io::{read_facility_workbook, write_clean_csv};
use crate::models::{CleanRecord, RawRecord};
use crate::normalize::{clean_name, clean_text, parse_coordinate_pair};

/// Per-file summary of a cleaning run
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// Input spreadsheet
    pub input: PathBuf,
    /// CSV file written
    pub output: PathBuf,
    /// Data rows read from the worksheet
    pub rows_read: usize,
    /// Rows written to the CSV
    pub rows_written: usize,
    /// Rows dropped because their coordinates were missing or unparseable
    pub rows_dropped: usize,
}

/// Normalize raw rows into clean records.
///
/// Rows whose coordinate string is empty or fails to parse are dropped,
/// never emitted with defaulted coordinates. Returns the surviving records
/// in input order along with the drop count.
pub fn clean_records(rows: &[RawRecord]) -> (Vec<CleanRecord>, usize) {
    let mut cleaned = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for row in rows {
        if row.coordinates.trim().is_empty() {
            debug!("Dropping row {:?}: no coordinates", row.facility_name);
            dropped += 1;
            continue;
        }

        let (lat, lon) = match parse_coordinate_pair(&row.coordinates) {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Error converting coordinates: {} - {}", row.coordinates, e);
                dropped += 1;
                continue;
            }
        };

        cleaned.push(CleanRecord {
            facility_name: clean_name(&row.facility_name),
            lat,
            lon,
            short_description: clean_text(&row.short_description),
            long_description: clean_text(&row.long_description),
        });
    }

    (cleaned, dropped)
}

/// Clean a single spreadsheet into `<stem>_cleaned.csv` under `output_dir`.
pub fn clean_file(input: &Path, output_dir: &Path) -> Result<CleanReport> {
    let rows = read_facility_workbook(input)
        .with_context(|| format!("Failed to load spreadsheet: {:?}", input))?;
    let (records, dropped) = clean_records(&rows);
    let output = output_path(input, output_dir);
    write_clean_csv(&records, &output)?;

    Ok(CleanReport {
        input: input.to_path_buf(),
        output,
        rows_read: rows.len(),
        rows_written: records.len(),
        rows_dropped: dropped,
    })
}

/// Clean every `.xlsx` file in `input_dir`.
///
/// Files are processed sequentially and independently: one that cannot be
/// loaded (unreadable, missing a required column) is logged and skipped,
/// and the batch continues. Write failures surface.
pub fn run_clean(input_dir: &Path, output_dir: &Path) -> Result<Vec<CleanReport>> {
    let files = discover_files(input_dir, "xlsx")?;
    if files.is_empty() {
        warn!("No .xlsx files found in {:?}", input_dir);
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();
    for file in &files {
        let report = match clean_file(file, output_dir) {
            Ok(report) => report,
            Err(e) => {
                warn!("Skipping {:?}: {:#}", file, e);
                continue;
            }
        };
        info!(
            "{:?}: {} rows read, {} written, {} dropped -> {:?}",
            report.input, report.rows_read, report.rows_written, report.rows_dropped,
            report.output
        );
        reports.push(report);
    }
    Ok(reports)
}

/// List files in `dir` with the given extension (case-insensitive), sorted.
pub fn discover_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("facilities");
    output_dir.join(format!("{stem}_cleaned.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, coordinates: &str) -> RawRecord {
        RawRecord {
            facility_name: name.to_string(),
            coordinates: coordinates.to_string(),
            short_description: "Short déscription".to_string(),
            long_description: "Long description".to_string(),
        }
    }

    #[test]
    fn test_valid_rows_survive_in_order() {
        let rows = vec![
            raw("Alpha Site", "34.05°N 118.25°W"),
            raw("Bravo Site", "33°52'0.0\"S 151°12'30.0\"E"),
        ];

        let (records, dropped) = clean_records(&rows);
        assert_eq!(dropped, 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].facility_name, "Alpha_Site");
        assert!((records[0].lat - 34.05).abs() < 1e-9);
        assert!((records[0].lon + 118.25).abs() < 1e-9);
        assert_eq!(records[0].short_description, "Short description");
        assert_eq!(records[1].facility_name, "Bravo_Site");
        assert!(records[1].lat < 0.0);
        assert!(records[1].lon > 0.0);
    }

    #[test]
    fn test_bad_coordinates_drop_row_only() {
        let rows = vec![
            raw("Good", "34.05°N 118.25°W"),
            raw("Bad", "bad data"),
            raw("Also Good", "10°N 20°E"),
        ];

        let (records, dropped) = clean_records(&rows);
        assert_eq!(dropped, 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].facility_name, "Good");
        assert_eq!(records[1].facility_name, "Also_Good");
    }

    #[test]
    fn test_empty_coordinates_drop_silently() {
        let rows = vec![raw("Nowhere", "")];
        let (records, dropped) = clean_records(&rows);
        assert!(records.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_dropped_rows_never_appear_with_zero_coords() {
        let rows = vec![raw("Bad", "garbage here")];
        let (records, _) = clean_records(&rows);
        assert!(records.iter().all(|r| r.facility_name != "Bad"));
    }

    #[test]
    fn test_discover_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.xlsx", "notes.txt", "c.XLSX"] {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }

        let files = discover_files(dir.path(), "xlsx").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.xlsx", "c.XLSX"]);
    }

    #[test]
    fn test_output_path_appends_cleaned_suffix() {
        let path = output_path(Path::new("/data/sites.xlsx"), Path::new("/out"));
        assert_eq!(path, Path::new("/out/sites_cleaned.csv"));
    }

    #[test]
    fn test_run_clean_skips_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        // Not a real workbook; the file is skipped and the batch continues.
        std::fs::write(dir.path().join("broken.xlsx"), b"not an xlsx").unwrap();

        let reports = run_clean(dir.path(), dir.path()).unwrap();
        assert!(reports.is_empty());
    }
}
