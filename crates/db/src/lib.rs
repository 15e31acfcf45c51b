//! Persistence for the dialogue generator.
//!
//! State lives in a string key-value store ([`store::KeyValueStore`]) with
//! one JSON document per key. Repositories load and rewrite whole documents
//! and notify the event bus after each write.

use std::str::FromStr;

use dialogue_core::error::CoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod repositories;
pub mod store;

pub use store::{KeyValueStore, MemoryStore, SqliteStore};

pub type DbPool = sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored data could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Create a connection pool from a database URL.
///
/// In-memory databases are private to a connection, so their pool holds a
/// single connection that is never recycled.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options.connect_with(options).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
