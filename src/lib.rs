//! Insert-throughput micro-benchmark for TimescaleDB and ClickHouse
//!
//! Generates a fixed set of synthetic records, provisions a benchmark table on
//! each target, and times write operations under several insertion strategies:
//!
//! | Strategy | Execution | Durability |
//! |----------|-----------|------------|
//! | Single-row | parallel workers, shared index counter | synchronous or deferred |
//! | Batched | sequential, one batch per iteration | synchronous or deferred |
//!
//! Both targets implement the [`InsertTarget`] trait, so the driver loops in
//! [`driver`] are target-agnostic. Durability is decided when a target is
//! connected ([`DurabilityMode`]) and translated at the boundary: ClickHouse
//! gets `async_insert` request settings, TimescaleDB gets
//! `synchronous_commit = off`.
//!
//! Schema setup is destructive: each run drops and recreates the benchmark
//! table. Setup failures abort the run; per-operation failures are recorded in
//! the [`driver::RunReport`] and skipped.
//!
//! # Entry points
//!
//! - `cargo bench --bench inserts` with `BENCH_LIVE=1` and running databases
//! - `cargo test -- --ignored` for the live integration tests
//! - `cargo run --release --bin loadtest` for a one-shot configurable run

pub mod config;
pub mod driver;
pub mod error;
pub mod record;
pub mod targets;

pub use config::{BenchConfig, ClickHouseConfig, TimescaleConfig};
pub use driver::{RunReport, run_batched, run_parallel};
pub use error::{BenchError, Result};
pub use record::{Record, Status, generate};
pub use targets::{ClickHouseTarget, DurabilityMode, InsertTarget, TimescaleTarget};
