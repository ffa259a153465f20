//! `file-convert <input_file> <target_format>`
//!
//! Prints the written path on success. On failure prints the categorised
//! error to stderr and exits with status 1.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use file_convert_core::{ConversionError, ConversionRequest, Converter, ConverterConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

const PROGRAM: &str = "file-convert";

/// Convert a file to another format, chosen by extension
#[derive(Parser, Debug)]
#[command(name = PROGRAM)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File to convert
    input: PathBuf,

    /// Target format, e.g. png, .MP4, pdf
    target_format: String,

    /// Ignored
    #[arg(hide = true)]
    extra: Vec<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            eprintln!(
                "{}",
                ConversionError::Usage {
                    program: PROGRAM.to_string()
                }
            );
            return ExitCode::from(1);
        }
    };

    file_convert_core::init_logging();

    match run(cli) {
        Ok(output) => {
            println!("{}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf> {
    if !cli.extra.is_empty() {
        warn!("Ignoring extra arguments: {:?}", cli.extra);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let converter = Converter::new(ConverterConfig::discover())?;
    let request = ConversionRequest::new(cli.input, &cli.target_format);

    Ok(runtime.block_on(converter.convert(&request))?)
}
