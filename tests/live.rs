//! Integration tests against live databases
//!
//! Ignored by default; they need running TimescaleDB and ClickHouse instances
//! (endpoints via BENCH_TIMESCALE_URL / BENCH_CLICKHOUSE_URL, localhost
//! defaults otherwise). Run with:
//!
//!   cargo test --test live -- --ignored

use std::collections::HashSet;
use std::sync::Arc;

use tsdb_bench::{
    BenchConfig, ClickHouseTarget, DurabilityMode, TimescaleTarget, generate, run_batched,
    run_parallel,
};

fn config() -> BenchConfig {
    BenchConfig::from_env()
}

// =============================================================================
// Connectivity
// =============================================================================

#[tokio::test]
#[ignore = "requires a running TimescaleDB instance"]
async fn timescale_connects_and_reports_version() {
    let target = TimescaleTarget::connect(&config().timescale, DurabilityMode::Synchronous)
        .await
        .expect("set up timescaledb");

    let version = target.version().await.expect("query version");
    assert!(version.contains("PostgreSQL"), "unexpected version: {version}");
    target.close().await;
}

#[tokio::test]
#[ignore = "requires a running ClickHouse instance"]
async fn clickhouse_connects_and_reports_version() {
    let target = ClickHouseTarget::connect(&config().clickhouse, DurabilityMode::Synchronous)
        .await
        .expect("set up clickhouse");

    let version = target.version().await.expect("query version");
    assert!(!version.is_empty());
    target.close().await;
}

// =============================================================================
// Persistence scenarios
// =============================================================================

#[tokio::test]
#[ignore = "requires a running TimescaleDB instance"]
async fn timescale_batch_of_five_persists_exactly_those_ids() {
    let records = generate(10);
    let target = TimescaleTarget::connect(&config().timescale, DurabilityMode::Synchronous)
        .await
        .expect("set up timescaledb");

    let report = run_batched(&target, &records, 1, 5).await;
    assert_eq!(report.succeeded(), 5);

    assert_eq!(target.row_count().await.expect("count rows"), 5);
    let ids: HashSet<i64> = target.row_ids().await.expect("fetch ids").into_iter().collect();
    assert_eq!(ids, HashSet::from([1, 2, 3, 4, 5]));

    target.close().await;
}

#[tokio::test]
#[ignore = "requires a running ClickHouse instance"]
async fn clickhouse_batch_of_five_persists_exactly_those_ids() {
    let records = generate(10);
    let target = ClickHouseTarget::connect(&config().clickhouse, DurabilityMode::Synchronous)
        .await
        .expect("set up clickhouse");

    let report = run_batched(&target, &records, 1, 5).await;
    assert_eq!(report.succeeded(), 5);

    assert_eq!(target.row_count().await.expect("count rows"), 5);
    let ids: HashSet<i64> = target.row_ids().await.expect("fetch ids").into_iter().collect();
    assert_eq!(ids, HashSet::from([1, 2, 3, 4, 5]));

    target.close().await;
}

#[tokio::test]
#[ignore = "requires a running TimescaleDB instance"]
async fn timescale_parallel_workers_persist_full_budget() {
    let records = Arc::new(generate(100));
    let target = Arc::new(
        TimescaleTarget::connect(&config().timescale, DurabilityMode::Synchronous)
            .await
            .expect("set up timescaledb"),
    );

    let report = run_parallel(Arc::clone(&target), records, 4, 200).await;
    assert_eq!(report.attempted, 200);
    assert_eq!(report.succeeded() + report.failed, 200);
    assert_eq!(target.row_count().await.expect("count rows"), report.succeeded());
}

#[tokio::test]
#[ignore = "requires a running ClickHouse instance"]
async fn clickhouse_deferred_batch_persists_all_rows() {
    let records = generate(1000);
    let target = ClickHouseTarget::connect(&config().clickhouse, DurabilityMode::Deferred)
        .await
        .expect("set up clickhouse");

    let report = run_batched(&target, &records, 2, 500).await;
    assert_eq!(report.succeeded(), 1000);
    assert_eq!(target.row_count().await.expect("count rows"), 1000);

    target.close().await;
}
