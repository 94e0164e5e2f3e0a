use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::io::read_clean_csv;
use crate::sink::SessionClient;

/// Per-file summary of an import run
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub input: PathBuf,
    /// Facilities created in the session
    pub imported: usize,
    /// Facilities that already existed and were replaced
    pub replaced: usize,
}

/// Import cleaned CSV files into the simulation session.
///
/// Unit preferences (degrees, meters) are configured once up front; an
/// unreachable bridge is fatal for the run. Rows are upserted sequentially
/// in file order. A CSV that cannot be read is logged and skipped.
pub async fn run_import(files: &[PathBuf], client: &SessionClient) -> Result<Vec<ImportReport>> {
    client
        .configure_units()
        .await
        .context("Failed to configure session units")?;

    let mut reports = Vec::new();
    for file in files {
        let records = match read_clean_csv(file) {
            Ok(records) => records,
            Err(e) => {
                warn!("Skipping {:?}: {:#}", file, e);
                continue;
            }
        };

        let mut imported = 0;
        let mut replaced = 0;
        for record in &records {
            if client.upsert_facility(record).await? {
                replaced += 1;
            }
            imported += 1;
        }

        info!(
            "Successfully imported {} facilities from {:?} ({} replaced)",
            imported, file, replaced
        );
        reports.push(ImportReport {
            input: file.clone(),
            imported,
            replaced,
        });
    }
    Ok(reports)
}
