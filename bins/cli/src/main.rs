//! GSTR-1 converter
//!
//! Reads a marketplace sales report and writes the GSTR-1 JSON return.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gstr1_cli::{convert_error, prompt, write_report};
use gstr1_core::build_report_from_path;
use gstr1_shared::{AppConfig, AppError};

/// Converts a sales report CSV into a GSTR-1 JSON return.
///
/// Anything not given on the command line comes from configuration
/// (`config/*.toml`, `GSTR1__*` variables); GSTIN and period are prompted
/// for when missing.
#[derive(Parser, Debug)]
#[command(name = "gstr1", version, about)]
struct Cli {
    /// Sales report to convert.
    #[arg(long)]
    input: Option<PathBuf>,
    /// GSTIN used in the output file name.
    #[arg(long)]
    gstin: Option<String>,
    /// Filing period (MMYYYY).
    #[arg(long)]
    period: Option<String>,
    /// Directory the return is written into.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Do not print the written file.
    #[arg(long)]
    no_echo: bool,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout carries the return itself
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gstr1=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Conversion failed");
            match err.downcast_ref::<AppError>() {
                Some(AppError::InputUnavailable(path)) => eprintln!(
                    "Error: Could not find the input file '{path}'. Please make sure it exists."
                ),
                _ => eprintln!("Error during conversion: {err:#}"),
            }
            ExitCode::from(err.downcast_ref::<AppError>().map_or(1, AppError::exit_code))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    let gstin = match cli.gstin {
        Some(gstin) => gstin,
        None => prompt(&mut stdin, &mut stdout, "Enter your GSTIN: ")?,
    };
    let period = match cli.period {
        Some(period) => period,
        None => prompt(&mut stdin, &mut stdout, "Enter the filing period (MMYYYY): ")?,
    };
    if gstin.is_empty() || period.is_empty() {
        return Err(AppError::Configuration("GSTIN and filing period are required".into()).into());
    }

    let input = cli.input.unwrap_or_else(|| PathBuf::from(&config.input.path));
    let report = build_report_from_path(&input, &period, &config.filing).map_err(convert_error)?;

    if !report.gstin.is_empty() && report.gstin != gstin {
        warn!(
            entered = %gstin,
            report = %report.gstin,
            "Entered GSTIN differs from the seller GSTIN in the report"
        );
    }

    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let path = write_report(&report, &output_dir, &gstin, &period)?;
    info!(path = %path.display(), "Return written");

    println!("Conversion complete. JSON file saved as {}", path.display());

    if config.output.echo && !cli.no_echo {
        let contents =
            fs::read_to_string(&path).map_err(|e| AppError::Output(format!("{}: {e}", path.display())))?;
        println!("\nContents of output JSON file:");
        println!("{contents}");
    }

    Ok(())
}
