//! SQLite pool for the catalog.
//!
//! The bot and the `catalog` tool share one database file. Writers are rare
//! (favourite toggles and seeding) so a small pool with a busy timeout is
//! enough to ride out lock contention between them.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DatabaseManager {
    pub pool: SqlitePool,
}

impl DatabaseManager {
    /// Opens the catalog at `database_url`, creating the file when missing.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        info!("Opened catalog database {}", database_url);
        Ok(Self { pool })
    }

    /// Brings the films, cinemas and users tables up to date.
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running catalog migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
