//! Insert-throughput benchmarks
//!
//! Mirrors the harness matrix: single-row (parallel) and batched (sequential)
//! inserts against TimescaleDB and ClickHouse, in synchronous and
//! deferred-durability modes. Provisioning happens inside each sample but
//! only the measured insert window is timed.
//!
//! Requires live databases. Run with:
//!   BENCH_LIVE=1 cargo bench --bench inserts
//!
//! Endpoints default to localhost and can be overridden via
//! BENCH_TIMESCALE_URL / BENCH_CLICKHOUSE_URL (see `config` module).

use std::sync::Arc;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use tsdb_bench::{
    BenchConfig, ClickHouseTarget, DurabilityMode, TimescaleTarget, generate, run_batched,
    run_parallel,
};

/// Workers for the single-row strategies
const WORKERS: usize = 8;

/// Insert operations per single-row sample
const SINGLE_OPS: u64 = 5_000;

/// Batches per batched sample
const BATCHES: u64 = 10;

const MODES: [DurabilityMode; 2] = [DurabilityMode::Synchronous, DurabilityMode::Deferred];

fn live_config() -> Option<BenchConfig> {
    if std::env::var("BENCH_LIVE").is_err() {
        static NOTICE: std::sync::Once = std::sync::Once::new();
        NOTICE.call_once(|| {
            eprintln!("skipping live insert benchmarks; set BENCH_LIVE=1 with databases running");
        });
        return None;
    }
    Some(BenchConfig::from_env())
}

// =============================================================================
// TimescaleDB
// =============================================================================

fn bench_timescale(c: &mut Criterion) {
    let Some(config) = live_config() else {
        return;
    };
    let rt = Runtime::new().unwrap();
    let records = Arc::new(generate(config.run.record_count));

    let mut group = c.benchmark_group("timescaledb");
    group.sample_size(10);

    for mode in MODES {
        group.throughput(Throughput::Elements(SINGLE_OPS));
        group.bench_function(BenchmarkId::new("single_row", mode.as_str()), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    total += rt.block_on(async {
                        let target = Arc::new(
                            TimescaleTarget::connect(&config.timescale, mode)
                                .await
                                .expect("set up timescaledb"),
                        );
                        run_parallel(target, Arc::clone(&records), WORKERS, SINGLE_OPS)
                            .await
                            .elapsed
                    });
                }
                total
            });
        });

        let batch_rows = BATCHES * config.run.batch_size as u64;
        group.throughput(Throughput::Elements(batch_rows));
        group.bench_function(BenchmarkId::new("batched", mode.as_str()), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    total += rt.block_on(async {
                        let target = TimescaleTarget::connect(&config.timescale, mode)
                            .await
                            .expect("set up timescaledb");
                        run_batched(&target, &records, BATCHES, config.run.batch_size)
                            .await
                            .elapsed
                    });
                }
                total
            });
        });
    }

    group.finish();
}

// =============================================================================
// ClickHouse
// =============================================================================

fn bench_clickhouse(c: &mut Criterion) {
    let Some(config) = live_config() else {
        return;
    };
    let rt = Runtime::new().unwrap();
    let records = Arc::new(generate(config.run.record_count));

    let mut group = c.benchmark_group("clickhouse");
    group.sample_size(10);

    for mode in MODES {
        group.throughput(Throughput::Elements(SINGLE_OPS));
        group.bench_function(BenchmarkId::new("single_row", mode.as_str()), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    total += rt.block_on(async {
                        let target = Arc::new(
                            ClickHouseTarget::connect(&config.clickhouse, mode)
                                .await
                                .expect("set up clickhouse"),
                        );
                        run_parallel(target, Arc::clone(&records), WORKERS, SINGLE_OPS)
                            .await
                            .elapsed
                    });
                }
                total
            });
        });

        let batch_rows = BATCHES * config.run.batch_size as u64;
        group.throughput(Throughput::Elements(batch_rows));
        group.bench_function(BenchmarkId::new("batched", mode.as_str()), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    total += rt.block_on(async {
                        let target = ClickHouseTarget::connect(&config.clickhouse, mode)
                            .await
                            .expect("set up clickhouse");
                        run_batched(&target, &records, BATCHES, config.run.batch_size)
                            .await
                            .elapsed
                    });
                }
                total
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_timescale, bench_clickhouse);
criterion_main!(benches);
