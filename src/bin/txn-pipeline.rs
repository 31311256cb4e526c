use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use txn_pipeline::generate::GeneratorOptions;
use txn_pipeline::observability::TracingObserver;
use txn_pipeline::pipeline::{run, PipelineOptions};
use txn_pipeline::processing::CleaningRules;
use txn_pipeline::sink::{build_sink, OutputType, SinkOptions};

/// Generate, transport, clean and summarize a synthetic transaction dataset
#[derive(Debug, Parser)]
#[command(name = "txn-pipeline", version)]
struct Args {
    /// Where to store the final report
    #[arg(long, value_enum, env = "TXN_OUTPUT_TYPE")]
    output_type: OutputType,

    /// Number of synthetic records
    #[arg(long, default_value_t = 50_000, env = "TXN_ROWS")]
    rows: usize,

    /// Records per envelope page
    #[arg(long, default_value_t = 1_000, env = "TXN_PAGE_SIZE")]
    page_size: usize,

    /// RNG seed for reproducible datasets
    #[arg(long, env = "TXN_SEED")]
    seed: Option<u64>,

    /// Minimum similarity for fuzzy corrections
    #[arg(long, default_value_t = 0.7, env = "TXN_THRESHOLD")]
    threshold: f64,

    /// Directory receiving per-page CSV artifacts
    #[arg(long, default_value = "dataset", env = "TXN_DATASET_DIR")]
    dataset_dir: PathBuf,

    /// Envelope JSON path
    #[arg(long, default_value = "transactions.json", env = "TXN_ENVELOPE")]
    envelope: PathBuf,

    /// Report path for the local sink
    #[arg(long, default_value = "final_dataset.csv", env = "TXN_OUTPUT")]
    output: PathBuf,

    /// Root directory of the object store
    #[arg(long, default_value = "object-store", env = "TXN_OBJECT_ROOT")]
    object_root: PathBuf,

    /// Object store bucket
    #[arg(long, default_value = "transactions", env = "TXN_BUCKET")]
    bucket: String,

    /// Object key of the report
    #[arg(long, default_value = "reports/final_dataset.csv", env = "TXN_OBJECT_KEY")]
    object_key: String,

    /// SQLite database path for the database sink
    #[arg(long, default_value = "transactions.db", env = "TXN_DATABASE")]
    database: PathBuf,

    /// Table receiving report rows
    #[arg(long, default_value = "transactions_report", env = "TXN_TABLE")]
    table: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.threshold) {
        anyhow::bail!("--threshold must be within [0, 1], got {}", args.threshold);
    }

    let sink = build_sink(
        args.output_type,
        &SinkOptions {
            output_path: args.output,
            object_root: args.object_root,
            bucket: args.bucket,
            object_key: args.object_key,
            database_path: args.database,
            table: args.table,
        },
    )?;

    let options = PipelineOptions {
        generator: GeneratorOptions {
            rows: args.rows,
            seed: args.seed,
        },
        page_size: args.page_size,
        dataset_dir: args.dataset_dir,
        envelope_path: args.envelope,
        cleaning: CleaningRules::with_threshold(args.threshold),
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };

    let summary = run(&options, sink.as_ref())?;

    println!("-----------------");
    println!("SUCCESS");
    println!("-----------------");
    println!("{}", summary.receipt);
    println!(
        "Pages: {}  Rows: {} generated, {} decoded  Countries: {}",
        summary.pages,
        summary.rows_generated,
        summary.rows_decoded,
        summary.report.len()
    );
    println!("Elapsed time: {:.3}s", summary.elapsed.as_secs_f64());
    Ok(())
}
