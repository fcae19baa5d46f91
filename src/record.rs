//! Synthetic record generation
//!
//! Produces the fixed dataset replayed by every insertion strategy. The set is
//! generated once per process and shared read-only, so all strategies and
//! targets measure against identical payloads.

use chrono::{DateTime, Duration, Utc};
use clickhouse::Row;
use rand::Rng;
use serde::{Serialize, Serializer};

/// Record status, drawn uniformly from this fixed enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Inactive,
    Pending,
    Completed,
}

impl Status {
    /// All statuses, in generation order
    pub const ALL: [Status; 4] = [
        Status::Active,
        Status::Inactive,
        Status::Pending,
        Status::Completed,
    ];

    /// Lowercase name, as stored in both targets
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Serialized as its name so the ClickHouse column is a plain String.
impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One synthetic row, matching the benchmark table on both targets
///
/// ```sql
/// CREATE TABLE bench_data (
///     id Int64,
///     timestamp DateTime64(3),
///     user_id Int64,
///     value Float64,
///     status LowCardinality(String)
/// )
/// ```
#[derive(Debug, Clone, Row, Serialize)]
pub struct Record {
    /// Unique sequential identifier, 1-based
    pub id: i64,

    /// Event time, within the trailing 24 hours of generation
    #[serde(with = "clickhouse::serde::chrono::datetime64::millis")]
    pub timestamp: DateTime<Utc>,

    /// Grouping key, uniform in `0..10_000`
    pub user_id: i64,

    /// Measurement, uniform in `[0, 1000)`
    pub value: f64,

    /// Status label
    pub status: Status,
}

/// Generate `count` records with unique sequential ids `1..=count`.
///
/// Field values are pseudo-random (seeded from OS entropy); the structure is
/// deterministic. Pure computation, no error conditions.
pub fn generate(count: usize) -> Vec<Record> {
    let mut rng = rand::rng();
    let now = Utc::now();

    (0..count)
        .map(|i| Record {
            id: (i + 1) as i64,
            timestamp: now - Duration::seconds(rng.random_range(0..86_400i64)),
            user_id: rng.random_range(0..10_000i64),
            value: rng.random_range(0.0..1000.0),
            status: Status::ALL[rng.random_range(0..Status::ALL.len())],
        })
        .collect()
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
