//! Benchmark error types

use thiserror::Error;

/// Result type for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur while provisioning targets or inserting records
#[derive(Debug, Error)]
pub enum BenchError {
    /// TimescaleDB driver error (connection, DDL, insert, transaction)
    #[error("timescaledb error: {0}")]
    Timescale(#[from] sqlx::Error),

    /// ClickHouse client error
    #[error("clickhouse error: {0}")]
    ClickHouse(#[from] clickhouse::error::Error),

    /// One-time setup failed (bad connection parameters, DDL rejected)
    #[error("setup error: {0}")]
    Setup(String),
}
