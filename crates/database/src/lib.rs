//! SQLite persistence layer for Courier seen records.
//!
//! This crate tracks, per user, the set of message ids that user has seen.
//! Ingestion goes through [`seen_record::create_or_merge`], which appends
//! only genuinely new ids to a user's record; corrective edits go through
//! [`seen_record::update`], a raw field patch.
//!
//! # Example
//!
//! ```no_run
//! use database::{models::NewSeenRecord, seen_record, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:courier.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Record two messages as seen by a user
//!     let new = NewSeenRecord {
//!         user_id: "u-1024".to_string(),
//!         username: Some("maryam".to_string()),
//!         message_ids: vec!["m-1".to_string(), "m-2".to_string()],
//!     };
//!     seen_record::create_or_merge(db.pool(), &new).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod page;
pub mod seen_record;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{NewSeenRecord, SeenRecord, SeenRecordPatch};
pub use page::{Page, PageInfo};
pub use seen_record::{CreateOutcome, SeenRecordFilter};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/courier.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
