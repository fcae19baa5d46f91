//! ClickHouse target
//!
//! HTTP client with LZ4 compression plus MergeTree provisioning. Batches are
//! buffered client-side and sent in a single `INSERT`, so they persist
//! all-or-nothing. A deferred-durability target adds the `async_insert`
//! request settings; the call still blocks until the server accepts the rows.

use async_trait::async_trait;
use clickhouse::{Client, Compression, insert::Insert};
use tracing::{debug, info};

use crate::config::{BENCH_TABLE, ClickHouseConfig};
use crate::error::Result;
use crate::record::Record;

use super::{DurabilityMode, InsertTarget};

/// Provisioned ClickHouse handle
pub struct ClickHouseTarget {
    client: Client,
}

impl ClickHouseTarget {
    /// Build the client and provision the benchmark table.
    ///
    /// Destructive: drops any pre-existing benchmark table. Fails fatally on
    /// connection or DDL errors; this is one-time setup, no retry.
    pub async fn connect(config: &ClickHouseConfig, mode: DurabilityMode) -> Result<Self> {
        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database)
            .with_compression(Compression::Lz4)
            .with_option("max_execution_time", config.max_execution_time.to_string());

        if let Some(ref username) = config.username {
            client = client.with_user(username);
        }
        if let Some(ref password) = config.password {
            client = client.with_password(password);
        }

        if mode == DurabilityMode::Deferred {
            client = client
                .with_option("async_insert", "1")
                .with_option("wait_for_async_insert", "1");
        }

        let target = Self { client };
        target.provision().await?;

        info!(
            url = %config.url,
            database = %config.database,
            table = BENCH_TABLE,
            durability = %mode,
            "clickhouse target provisioned"
        );
        Ok(target)
    }

    /// Drop and recreate the benchmark MergeTree table
    async fn provision(&self) -> Result<()> {
        self.client
            .query(&format!("DROP TABLE IF EXISTS {BENCH_TABLE}"))
            .execute()
            .await?;

        self.client
            .query(&format!(
                "CREATE TABLE {BENCH_TABLE} (
                    id Int64,
                    timestamp DateTime64(3),
                    user_id Int64,
                    value Float64,
                    status LowCardinality(String)
                ) ENGINE = MergeTree()
                ORDER BY (user_id, timestamp)
                PARTITION BY toYYYYMM(timestamp)
                SETTINGS index_granularity = 8192"
            ))
            .execute()
            .await?;

        Ok(())
    }

    /// Server version string, for connectivity checks
    pub async fn version(&self) -> Result<String> {
        let version = self
            .client
            .query("SELECT version()")
            .fetch_one::<String>()
            .await?;
        Ok(version)
    }

    /// Number of rows currently in the benchmark table
    pub async fn row_count(&self) -> Result<u64> {
        let count = self
            .client
            .query(&format!("SELECT count() FROM {BENCH_TABLE}"))
            .fetch_one::<u64>()
            .await?;
        Ok(count)
    }

    /// Ids of all persisted rows, ascending
    pub async fn row_ids(&self) -> Result<Vec<i64>> {
        let ids = self
            .client
            .query(&format!("SELECT id FROM {BENCH_TABLE} ORDER BY id"))
            .fetch_all::<i64>()
            .await?;
        Ok(ids)
    }

    /// Release the client at the end of a run
    pub async fn close(self) {
        // HTTP client holds no server-side state; dropping it is enough.
        info!(table = BENCH_TABLE, "clickhouse target released");
    }
}

#[async_trait]
impl InsertTarget for ClickHouseTarget {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    async fn insert_row(&self, record: &Record) -> Result<()> {
        let mut insert: Insert<Record> = self.client.insert(BENCH_TABLE).await?;
        insert.write(record).await?;
        insert.end().await?;
        Ok(())
    }

    async fn insert_batch(&self, records: &[Record]) -> Result<u64> {
        let mut insert: Insert<Record> = self.client.insert(BENCH_TABLE).await?;
        for record in records {
            insert.write(record).await?;
        }
        insert.end().await?;

        debug!(table = BENCH_TABLE, rows = records.len(), "batch sent");
        Ok(records.len() as u64)
    }
}
