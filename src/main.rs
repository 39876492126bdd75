use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use payroll_aggregator::{
    load_csv, logging, synthetic_records, Accumulator, AggregatorConfig, Category,
    ConcurrentAggregator, DeduplicationEngine,
};

#[derive(Parser, Debug)]
#[command(name = "payroll-aggregator")]
#[command(about = "Sum salaries per role into a slow store, concurrently and under a deadline")]
struct Args {
    /// Payroll CSV with a name,salary,role header
    #[arg(short, long, env = "PAYROLL_INPUT", conflicts_with = "generate")]
    input: Option<PathBuf>,

    /// Generate a demo batch of this many records instead of reading a CSV
    #[arg(short, long, default_value = "1000")]
    generate: usize,

    /// Worker threads in the increment pool
    #[arg(long, env = "PAYROLL_WORKERS", default_value = "32")]
    workers: usize,

    /// Latency of every store write, in milliseconds
    #[arg(long, env = "PAYROLL_LATENCY_MS", default_value = "3")]
    latency_ms: u64,

    /// Wall-clock budget for the run, in milliseconds
    #[arg(long, env = "PAYROLL_DEADLINE_MS", default_value = "3000")]
    deadline_ms: u64,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    dotenv().ok();
    logging::init_tracing(logging::DEFAULT_FILTER);

    let args = Args::parse();

    let config = AggregatorConfig::default()
        .with_workers(args.workers)
        .with_latency(Duration::from_millis(args.latency_ms))
        .with_deadline(Duration::from_millis(args.deadline_ms));

    let records = match &args.input {
        Some(path) => load_csv(path)?,
        None => synthetic_records(args.generate),
    };

    let duplicates = DeduplicationEngine::new().find_duplicates(&records);
    if !duplicates.is_empty() {
        warn!(duplicates = duplicates.len(), "duplicate records will be ignored");
    }

    let store = config.build_store();
    let aggregator = ConcurrentAggregator::new(config).context("Failed to start aggregator")?;
    let report = aggregator
        .aggregate_with_default_deadline(&records, &store)
        .context("Aggregation did not complete")?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("Time taken: {} milliseconds", report.elapsed_ms);
        println!("Boss: {}", store.total(Category::Boss));
        println!("Developer: {}", store.total(Category::Developer));
    }

    Ok(())
}
