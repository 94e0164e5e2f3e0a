use serde::{Deserialize, Serialize};

/// A raw facility row as it appears in an input spreadsheet.
///
/// All fields are kept as text at this point; empty cells become empty
/// strings. Coordinate parsing and text cleanup happen in the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub facility_name: String,
    /// Two whitespace-separated tokens, latitude then longitude, each in
    /// decimal-degree (`34.05°N`) or DMS (`34°3'1.2"N`) form.
    pub coordinates: String,
    pub short_description: String,
    pub long_description: String,
}

/// A normalized facility row, ready for CSV output or session import.
///
/// Field order defines the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// ASCII name, word characters and underscores only.
    pub facility_name: String,
    /// Signed decimal degrees, south negative.
    pub lat: f64,
    /// Signed decimal degrees, west negative.
    pub lon: f64,
    pub short_description: String,
    pub long_description: String,
}
