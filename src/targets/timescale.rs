//! TimescaleDB target
//!
//! Pooled Postgres connection plus hypertable provisioning. Batches run in a
//! transaction and commit atomically; a deferred-durability target turns off
//! `synchronous_commit` both at connect time (for the single-row path) and
//! with `SET LOCAL` inside each batch transaction.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use crate::config::{BENCH_TABLE, TimescaleConfig};
use crate::error::Result;
use crate::record::Record;

use super::{DurabilityMode, InsertTarget};

const INSERT_SQL: &str =
    "INSERT INTO bench_data (id, timestamp, user_id, value, status) VALUES ($1, $2, $3, $4, $5)";

/// Provisioned TimescaleDB handle
pub struct TimescaleTarget {
    pool: PgPool,
    mode: DurabilityMode,
}

impl TimescaleTarget {
    /// Open the connection pool and provision the benchmark table.
    ///
    /// Destructive: drops any pre-existing benchmark table. Fails fatally on
    /// connection or DDL errors; this is one-time setup, no retry.
    pub async fn connect(config: &TimescaleConfig, mode: DurabilityMode) -> Result<Self> {
        let mut options: PgConnectOptions = config.url.parse()?;
        if mode == DurabilityMode::Deferred {
            options = options.options([("synchronous_commit", "off")]);
        }

        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        let target = Self { pool, mode };
        target.provision().await?;

        info!(
            table = BENCH_TABLE,
            durability = %mode,
            pool_min = config.min_connections,
            pool_max = config.max_connections,
            "timescaledb target provisioned"
        );
        Ok(target)
    }

    /// Drop and recreate the benchmark hypertable
    async fn provision(&self) -> Result<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {BENCH_TABLE}"))
            .execute(&self.pool)
            .await?;

        sqlx::query(&format!(
            "CREATE TABLE {BENCH_TABLE} (
                id BIGINT NOT NULL,
                timestamp TIMESTAMPTZ NOT NULL,
                user_id BIGINT NOT NULL,
                value DOUBLE PRECISION NOT NULL,
                status TEXT NOT NULL
            )"
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "SELECT create_hypertable('{BENCH_TABLE}', 'timestamp')"
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX ON {BENCH_TABLE} (user_id, timestamp DESC)"
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Server version string, for connectivity checks
    pub async fn version(&self) -> Result<String> {
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&self.pool)
            .await?;
        Ok(version)
    }

    /// Number of rows currently in the benchmark table
    pub async fn row_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT count(*) FROM {BENCH_TABLE}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    /// Ids of all persisted rows, ascending
    pub async fn row_ids(&self) -> Result<Vec<i64>> {
        let ids: Vec<i64> =
            sqlx::query_scalar(&format!("SELECT id FROM {BENCH_TABLE} ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(ids)
    }

    /// Release the pool at the end of a run
    pub async fn close(self) {
        self.pool.close().await;
        info!(table = BENCH_TABLE, "timescaledb target released");
    }
}

#[async_trait]
impl InsertTarget for TimescaleTarget {
    fn name(&self) -> &'static str {
        "timescaledb"
    }

    async fn insert_row(&self, record: &Record) -> Result<()> {
        sqlx::query(INSERT_SQL)
            .bind(record.id)
            .bind(record.timestamp)
            .bind(record.user_id)
            .bind(record.value)
            .bind(record.status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_batch(&self, records: &[Record]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        if self.mode == DurabilityMode::Deferred {
            sqlx::query("SET LOCAL synchronous_commit = 'off'")
                .execute(&mut *tx)
                .await?;
        }

        for record in records {
            let result = sqlx::query(INSERT_SQL)
                .bind(record.id)
                .bind(record.timestamp)
                .bind(record.user_id)
                .bind(record.value)
                .bind(record.status.as_str())
                .execute(&mut *tx)
                .await;

            if let Err(e) = result {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                return Err(e.into());
            }
        }

        tx.commit().await?;
        debug!(table = BENCH_TABLE, rows = records.len(), "batch committed");
        Ok(records.len() as u64)
    }
}
