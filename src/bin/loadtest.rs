//! One-shot benchmark runner
//!
//! Run a single strategy against a live target and print a compact report.
//!
//! Usage:
//!   cargo run --release --bin loadtest -- --target timescale --strategy single
//!   cargo run --release --bin loadtest -- --target clickhouse --strategy batch \
//!       --durability deferred --batches 200

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sysinfo::System;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tsdb_bench::{
    BenchConfig, ClickHouseTarget, DurabilityMode, InsertTarget, Record, RunReport,
    TimescaleTarget, generate, run_batched, run_parallel,
};

#[derive(Parser, Debug)]
#[command(name = "loadtest", about = "TimescaleDB / ClickHouse insert benchmark")]
struct Args {
    /// Database to benchmark
    #[arg(short, long, value_enum)]
    target: TargetKind,

    /// Insertion strategy
    #[arg(short, long, value_enum, default_value = "single")]
    strategy: Strategy,

    /// Durability mode
    #[arg(short, long, value_enum, default_value = "sync")]
    durability: Durability,

    /// Parallel workers (single-row strategy)
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Total insert operations (single-row strategy)
    #[arg(short, long, default_value = "10000")]
    ops: u64,

    /// Batches to send (batched strategy)
    #[arg(short, long, default_value = "100")]
    batches: u64,

    /// Rows per batch
    #[arg(long, default_value = "1000")]
    batch_size: usize,

    /// Records to pre-generate
    #[arg(short, long, default_value = "10000")]
    records: usize,

    /// TimescaleDB URL (overrides BENCH_TIMESCALE_URL)
    #[arg(long)]
    timescale_url: Option<String>,

    /// ClickHouse URL (overrides BENCH_CLICKHOUSE_URL)
    #[arg(long)]
    clickhouse_url: Option<String>,

    /// Log level filter
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetKind {
    Timescale,
    Clickhouse,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// One insert statement per record, parallel workers
    Single,
    /// Transactional batches, sequential
    Batch,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Durability {
    /// Fully durable before acknowledgment
    Sync,
    /// Deferred durability (async insert / synchronous_commit off)
    Deferred,
}

impl From<Durability> for DurabilityMode {
    fn from(d: Durability) -> Self {
        match d {
            Durability::Sync => DurabilityMode::Synchronous,
            Durability::Deferred => DurabilityMode::Deferred,
        }
    }
}

/// System information for benchmark context
struct SystemInfo {
    cpu_name: String,
    cpu_cores: usize,
    memory_gb: f64,
    os: String,
    arch: String,
}

impl SystemInfo {
    fn collect() -> Self {
        let sys = System::new_all();

        let cpu_name = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let cpu_cores = sys.cpus().len();
        let memory_gb = sys.total_memory() as f64 / 1_073_741_824.0;

        let os = format!(
            "{} {}",
            System::name().unwrap_or_else(|| "Unknown".to_string()),
            System::os_version().unwrap_or_default()
        );

        let arch = std::env::consts::ARCH.to_string();

        Self {
            cpu_name,
            cpu_cores,
            memory_gb,
            os,
            arch,
        }
    }

    fn one_line(&self) -> String {
        format!(
            "{} ({}) | {} cores | {:.1} GB | {}",
            self.cpu_name, self.arch, self.cpu_cores, self.memory_gb, self.os
        )
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();

    Ok(())
}

async fn execute<T>(target: Arc<T>, records: Arc<Vec<Record>>, args: &Args) -> RunReport
where
    T: InsertTarget + 'static,
{
    match args.strategy {
        Strategy::Single => run_parallel(target, records, args.workers, args.ops).await,
        Strategy::Batch => {
            run_batched(target.as_ref(), &records, args.batches, args.batch_size).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut config = BenchConfig::from_env();
    if let Some(url) = &args.timescale_url {
        config.timescale.url = url.clone();
    }
    if let Some(url) = &args.clickhouse_url {
        config.clickhouse.url = url.clone();
    }

    let mode: DurabilityMode = args.durability.into();
    let records = Arc::new(generate(args.records));

    println!(
        "Insert Bench | {:?} {:?} {} | {} records",
        args.target, args.strategy, mode, args.records
    );
    println!("System      | {}", SystemInfo::collect().one_line());

    let report = match args.target {
        TargetKind::Timescale => {
            let target = Arc::new(
                TimescaleTarget::connect(&config.timescale, mode)
                    .await
                    .context("failed to set up TimescaleDB")?,
            );
            let report = execute(Arc::clone(&target), records, &args).await;
            if let Ok(target) = Arc::try_unwrap(target) {
                target.close().await;
            }
            report
        }
        TargetKind::Clickhouse => {
            let target = Arc::new(
                ClickHouseTarget::connect(&config.clickhouse, mode)
                    .await
                    .context("failed to set up ClickHouse")?,
            );
            let report = execute(Arc::clone(&target), records, &args).await;
            if let Ok(target) = Arc::try_unwrap(target) {
                target.close().await;
            }
            report
        }
    };

    println!("Results     | {report}");
    Ok(())
}
