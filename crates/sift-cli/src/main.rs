use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use sift_core::pipeline::{self, PipelineConfig};

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Select columns and filter rows of a CSV file")]
#[command(version)]
struct Cli {
    #[arg(short = 'i', long, alias = "input_file", help = "Input CSV file")]
    input_file: PathBuf,

    #[arg(
        short = 'o',
        long,
        alias = "output_file",
        help = "Output CSV file (overwritten if it exists)"
    )]
    output_file: PathBuf,

    #[arg(
        short = 'c',
        long,
        num_args = 1..,
        required = true,
        help = "Column names to keep, in output order"
    )]
    columns: Vec<String>,

    #[arg(
        short = 'q',
        long,
        help = "Row filter expression (e.g. \"age > 26 and name != 'Bob'\"). Omit to keep every row."
    )]
    query: Option<String>,

    #[arg(short, long, help = "Verbose output")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    tracing::debug!("Configuration:");
    tracing::debug!("  Input file: {:?}", cli.input_file);
    tracing::debug!("  Output file: {:?}", cli.output_file);
    tracing::debug!("  Columns: {:?}", cli.columns);
    tracing::debug!(
        "  Query: {}",
        cli.query.as_deref().unwrap_or("<none, keep every row>")
    );

    let config = PipelineConfig {
        input: cli.input_file,
        output: cli.output_file,
        columns: cli.columns,
        query: cli.query,
    };

    let summary = pipeline::run(&config)?;

    tracing::info!(
        "kept {} of {} rows, written to {:?}",
        summary.rows_written,
        summary.rows_read,
        config.output
    );

    Ok(())
}
