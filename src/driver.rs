//! Benchmark driver
//!
//! Two execution shapes over any [`InsertTarget`]:
//!
//! - [`run_parallel`]: worker tasks claim iteration indices from a shared
//!   atomic counter and issue one single-row insert each, until the budget is
//!   exhausted. No ordering across workers.
//! - [`run_batched`]: strictly sequential, one batch per iteration.
//!
//! Both draw records from the pre-generated set with modular indexing, so the
//! same logical payload is replayed across iterations. The timer starts after
//! provisioning and batch construction; setup cost is never measured.
//! Per-operation failures are counted and logged, never fatal.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::record::Record;
use crate::targets::InsertTarget;

/// Outcome of one benchmark run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Target name ("timescaledb", "clickhouse")
    pub target: &'static str,

    /// Strategy name ("single_row", "batched")
    pub strategy: &'static str,

    /// Rows the run attempted to insert
    pub attempted: u64,

    /// Rows that failed (a failed batch counts all of its rows)
    pub failed: u64,

    /// Wall time of the measurement window
    pub elapsed: Duration,
}

impl RunReport {
    /// Rows confirmed written
    pub fn succeeded(&self) -> u64 {
        self.attempted - self.failed
    }

    /// Write throughput over the measurement window
    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.succeeded() as f64 / secs
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} | {} rows | {} errors | {:.2}s | {:.0} rows/s",
            self.target,
            self.strategy,
            self.attempted,
            self.failed,
            self.elapsed.as_secs_f64(),
            self.rows_per_sec(),
        )
    }
}

/// Run the single-row strategy with `workers` parallel tasks.
///
/// Exactly `total_ops` insert attempts are made; successes plus recorded
/// failures sum to `total_ops`. Workers pull the next record index from a
/// shared counter, so the distribution of work across workers is unspecified.
pub async fn run_parallel<T>(
    target: Arc<T>,
    records: Arc<Vec<Record>>,
    workers: usize,
    total_ops: u64,
) -> RunReport
where
    T: InsertTarget + 'static,
{
    let name = target.name();
    if records.is_empty() || total_ops == 0 {
        return RunReport {
            target: name,
            strategy: "single_row",
            attempted: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        };
    }

    let next = Arc::new(AtomicU64::new(0));
    let failed = Arc::new(AtomicU64::new(0));
    let workers = workers.max(1);

    let start = Instant::now();
    let mut tasks = JoinSet::new();

    for _ in 0..workers {
        let target = Arc::clone(&target);
        let records = Arc::clone(&records);
        let next = Arc::clone(&next);
        let failed = Arc::clone(&failed);

        tasks.spawn(async move {
            loop {
                let i = next.fetch_add(1, Ordering::Relaxed);
                if i >= total_ops {
                    break;
                }

                let record = &records[i as usize % records.len()];
                if let Err(e) = target.insert_row(record).await {
                    failed.fetch_add(1, Ordering::Relaxed);
                    warn!(db = name, error = %e, id = record.id, "insert failed");
                }
            }
        });
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!(db = name, error = %e, "worker task failed");
        }
    }

    RunReport {
        target: name,
        strategy: "single_row",
        attempted: total_ops,
        failed: failed.load(Ordering::Relaxed),
        elapsed: start.elapsed(),
    }
}

/// Run the batched strategy sequentially for `iterations` batches.
///
/// The batch payload is fixed: the first `batch_size` records of the
/// generated set (with wraparound), identical for every iteration. A failed
/// batch is skipped as a unit and counts all of its rows as failed.
pub async fn run_batched<T>(
    target: &T,
    records: &[Record],
    iterations: u64,
    batch_size: usize,
) -> RunReport
where
    T: InsertTarget + ?Sized,
{
    let name = target.name();
    if records.is_empty() || batch_size == 0 || iterations == 0 {
        return RunReport {
            target: name,
            strategy: "batched",
            attempted: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        };
    }

    let batch: Vec<Record> = (0..batch_size)
        .map(|j| records[j % records.len()].clone())
        .collect();

    let mut failed = 0u64;
    let start = Instant::now();

    for _ in 0..iterations {
        if let Err(e) = target.insert_batch(&batch).await {
            failed += batch_size as u64;
            warn!(db = name, error = %e, rows = batch_size, "batch failed");
        }
    }

    RunReport {
        target: name,
        strategy: "batched",
        attempted: iterations * batch_size as u64,
        failed,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;
