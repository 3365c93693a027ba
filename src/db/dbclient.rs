use std::str::FromStr;
use std::time::Duration;

use sqlx::query;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::db::schema::TABLES;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DBClient {
    pool: SqlitePool,
}

impl DBClient {
    pub async fn new(db_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let client = Self { pool };
        client.create_tables().await?;

        Ok(client)
    }

    /// A private database that lives as long as the client. Backed by a single
    /// connection, which is never recycled since that would drop the data.
    #[cfg(test)]
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let client = Self { pool };
        client.create_tables().await?;

        Ok(client)
    }

    pub fn conn(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_tables(&self) -> anyhow::Result<()> {
        for table in TABLES {
            query(table).execute(&self.pool).await?;
        }

        debug!(statements = TABLES.len(), "Database schema applied.");

        Ok(())
    }
}
