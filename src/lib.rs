pub mod io;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod sink;

pub use io::{read_clean_csv, read_facility_workbook, write_clean_csv, WorkbookError};
pub use models::{CleanRecord, RawRecord};
pub use normalize::{clean_name, clean_text, parse_coordinate_pair, CoordError};
pub use pipeline::{
    clean_file, clean_records, discover_files, run_clean, run_import, CleanReport, ImportReport,
};
pub use sink::{BridgeConfig, SessionClient, DEFAULT_BRIDGE_URL};
