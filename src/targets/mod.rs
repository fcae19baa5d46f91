//! Benchmark targets
//!
//! One module per database. Each target owns its connection handle for the
//! duration of a run: created by `connect()` (which also provisions the
//! schema), released by `close()`. Both implement [`InsertTarget`] so the
//! driver loops and the tests are target-agnostic.

mod clickhouse;
mod timescale;

pub use clickhouse::ClickHouseTarget;
pub use timescale::TimescaleTarget;

use async_trait::async_trait;

use crate::error::Result;
use crate::record::Record;

/// How the target acknowledges durability of a write.
///
/// Chosen at target construction and translated per target: ClickHouse maps
/// `Deferred` to `async_insert=1` / `wait_for_async_insert=1` request
/// settings, TimescaleDB to `synchronous_commit = off`. In both cases the
/// client call still blocks until the server accepts the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// Write is fully durable before it is acknowledged
    #[default]
    Synchronous,
    /// Server acknowledges acceptance before the write is durable
    Deferred,
}

impl DurabilityMode {
    /// Lowercase name for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            DurabilityMode::Synchronous => "synchronous",
            DurabilityMode::Deferred => "deferred",
        }
    }
}

impl std::fmt::Display for DurabilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A provisioned database ready to accept benchmark writes
#[async_trait]
pub trait InsertTarget: Send + Sync {
    /// Target name for logs and benchmark ids
    fn name(&self) -> &'static str;

    /// Insert a single record; independently acknowledged or failed
    async fn insert_row(&self, record: &Record) -> Result<()>;

    /// Insert a batch of records in one round trip.
    ///
    /// All-or-nothing: on any row-level failure none of the batch persists.
    /// Returns the number of rows written.
    async fn insert_batch(&self, records: &[Record]) -> Result<u64>;
}
