//! Database connection and repositories

pub mod authors;
pub mod books;
pub mod schema_sync;
pub mod sqlite_helpers;
pub mod users;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use authors::{AuthorRecord, AuthorRepository, CreateAuthor, UpdateAuthor};
pub use books::{BookRecord, BookRepository, CreateBook, UpdateBook};
pub use schema_sync::SchemaSyncResult;
pub use users::{CreateUser, RefreshTokenRecord, UserRecord, UsersRepository};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn connect_options(url: &str) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Make sure the directory for a file-backed database exists
        let filename = options.get_filename();
        if filename != Path::new(":memory:")
            && let Some(parent) = filename.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }

        Ok(options)
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(Self::connect_options(url)?)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new database connection pool, retrying every `retry_interval`
    /// until `timeout` has elapsed
    pub async fn connect_with_retry(
        url: &str,
        max_connections: u32,
        retry_interval: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match Self::connect(url, max_connections).await {
                Ok(db) => return Ok(db),
                Err(e) if tokio::time::Instant::now() + retry_interval < deadline => {
                    tracing::warn!(
                        error = %e,
                        retry_in_secs = retry_interval.as_secs(),
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(retry_interval).await;
                }
                Err(e) => return Err(e.context("Database connection timed out")),
            }
        }
    }

    /// Open a private in-memory database (single connection, so every query sees the same data)
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create missing tables
    pub async fn sync_schema(&self) -> Result<SchemaSyncResult> {
        schema_sync::sync_schema(&self.pool)
            .await
            .context("Schema sync failed")
    }

    /// Check connectivity
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get an authors repository
    pub fn authors(&self) -> AuthorRepository {
        AuthorRepository::new(self.pool.clone())
    }

    /// Get a books repository
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }
}
