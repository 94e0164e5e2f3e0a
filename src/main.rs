use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use facprep::{
    discover_files, parse_coordinate_pair, read_facility_workbook, run_clean, run_import,
    BridgeConfig, SessionClient,
};

#[derive(Parser)]
#[command(name = "facprep")]
#[command(author, version, about = "Facility record cleanup and simulation import pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize facility spreadsheets into cleaned CSV files
    Clean {
        /// Directory containing input .xlsx files
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Directory for the _cleaned.csv output files (defaults to the
        /// input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Import cleaned CSV files into a running simulation session
    Import {
        /// A cleaned CSV file, or a directory of them
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Automation bridge URL (overrides SIM_BRIDGE_URL)
        #[arg(long)]
        bridge_url: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Inspect a spreadsheet without writing anything
    Inspect {
        /// Input .xlsx file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            input,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            let output = output.unwrap_or_else(|| input.clone());
            clean_directory(input, output)
        }
        Commands::Import {
            input,
            bridge_url,
            verbose,
        } => {
            setup_logging(verbose);
            import_files(input, bridge_url).await
        }
        Commands::Inspect { input, verbose } => {
            setup_logging(verbose);
            inspect_workbook(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn clean_directory(input: PathBuf, output: PathBuf) -> Result<()> {
    info!("Cleaning spreadsheets in {:?}", input);
    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {:?}", output))?;

    let reports = run_clean(&input, &output)?;

    let written: usize = reports.iter().map(|r| r.rows_written).sum();
    let dropped: usize = reports.iter().map(|r| r.rows_dropped).sum();
    info!(
        "Complete: {} files cleaned, {} rows written, {} dropped",
        reports.len(),
        written,
        dropped
    );
    Ok(())
}

async fn import_files(input: PathBuf, bridge_url: Option<String>) -> Result<()> {
    let files = if input.is_dir() {
        let files = discover_files(&input, "csv")?;
        if files.is_empty() {
            anyhow::bail!("No .csv files found in {:?}", input);
        }
        files
    } else {
        vec![input]
    };

    let config = match bridge_url {
        Some(url) => BridgeConfig::new(url),
        None => BridgeConfig::from_env(),
    };
    info!("Importing into session at {}", config.base_url);
    let client = SessionClient::new(config);

    let reports = run_import(&files, &client).await?;

    let imported: usize = reports.iter().map(|r| r.imported).sum();
    let replaced: usize = reports.iter().map(|r| r.replaced).sum();
    info!(
        "Complete: {} facilities imported ({} replaced)",
        imported, replaced
    );
    Ok(())
}

fn inspect_workbook(input: PathBuf) -> Result<()> {
    info!("Inspecting {:?}", input);
    let rows = read_facility_workbook(&input)
        .with_context(|| format!("Failed to load spreadsheet: {:?}", input))?;

    println!("Workbook Inspection");
    println!("===================");
    println!("Data rows: {}", rows.len());
    println!();

    let mut parseable = 0;
    let mut empty = 0;
    let mut invalid = Vec::new();

    for row in &rows {
        if row.coordinates.trim().is_empty() {
            empty += 1;
        } else if parse_coordinate_pair(&row.coordinates).is_ok() {
            parseable += 1;
        } else {
            invalid.push(row.coordinates.as_str());
        }
    }

    println!("Coordinates");
    println!("-----------");
    println!("Parseable: {}", parseable);
    println!("Empty: {}", empty);
    println!("Invalid: {}", invalid.len());
    for coords in &invalid {
        println!("  {:?}", coords);
    }
    println!();
    println!(
        "A clean run would write {} of {} rows",
        parseable,
        rows.len()
    );

    Ok(())
}
