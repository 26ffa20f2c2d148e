// Needed to write partial lines to the console
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cifar_bmp::cifar::{Batch, Dataset, DEFAULT_DATA_DIR};
use cifar_bmp::convert::{convert_batch, Options};
use cifar_bmp::Compat;

/// Convert a CIFAR-10 binary batch into one bitmap per image
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory containing the extracted batch files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Batch to convert: 1-5 for training batches, t for the test batch
    #[arg(long, default_value = "t")]
    dataset: Dataset,

    /// Directory the bitmaps are written to
    #[arg(long, default_value = "files")]
    output_dir: PathBuf,

    /// Index of the first record to convert
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Number of records to convert [default: the rest of the batch]
    #[arg(long)]
    count: Option<usize>,

    /// Reproduce the old converter's output (batch 5 reads batch 4, black saturates to white)
    #[arg(long)]
    legacy: bool,

    /// Convert records on all cores
    #[arg(long)]
    parallel: bool,

    /// Write an index,label,file CSV manifest to this path
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Create the output directory if it is missing
    #[arg(long)]
    create_output_dir: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let compat = if args.legacy {
        Compat::Legacy
    } else {
        Compat::Corrected
    };
    let options = Options {
        data_dir: args.data_dir,
        dataset: args.dataset,
        output_dir: args.output_dir,
        start: args.start,
        count: args.count,
        compat,
        parallel: args.parallel,
        labels: args.labels,
        create_output_dir: args.create_output_dir,
    };

    // Load the whole batch up front
    let path = options.dataset.path(&options.data_dir, compat);
    print!("Loading batch... ");
    let _ = io::stdout().flush();
    let now = Instant::now();
    let batch = Batch::open(&path).context("Failed to load batch")?;
    println!(
        "Loaded {} records from {} [{}ms]",
        batch.len(),
        path.display(),
        now.elapsed().as_millis()
    );

    println!("=== Converting records ===");
    let now = Instant::now();
    let summary = convert_batch(&batch, &options)?;
    println!(
        "=== Done - {} written, {} failed [{}ms] ===",
        summary.converted.len(),
        summary.failed.len(),
        now.elapsed().as_millis()
    );

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
