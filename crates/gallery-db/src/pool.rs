//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use std::time::Duration;

use gallery_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Tuning knobs for a file-backed pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolOptions {
    /// Maximum number of open connections.
    pub max_size: u32,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// How long a caller waits for a free connection before failing.
    pub connection_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_size: 4,
            busy_timeout: Duration::from_millis(5000),
            connection_timeout: Duration::from_secs(30),
        }
    }
}

/// Initialize a new database pool with the given file path and default options.
///
/// # Example
///
/// ```no_run
/// use gallery_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/gallery/gallery.db").unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    init_pool_with(db_path, &PoolOptions::default())
}

/// Initialize a new database pool with explicit options.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Switch the database to WAL journaling so readers never block on writers
/// - Apply the busy timeout and enable foreign keys on every connection
/// - Run pending database migrations
pub fn init_pool_with(db_path: &str, options: &PoolOptions) -> Result<DbPool> {
    let busy_timeout = options.busy_timeout;
    let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
        // The timeout must be in place before the journal mode switch, which
        // needs an exclusive lock while sibling connections are opening.
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
    });

    let pool = Pool::builder()
        .max_size(options.max_size.max(1))
        .connection_timeout(options.connection_timeout)
        .build(manager)
        .map_err(|e| Error::storage(format!("Failed to create connection pool: {}", e)))?;

    prepare(&pool)?;

    tracing::info!(
        path = db_path,
        max_size = pool.max_size(),
        "Opened catalog database"
    );

    Ok(pool)
}

/// Initialize an in-memory database pool.
///
/// Every SQLite in-memory connection is its own database, so the pool holds
/// exactly one connection and never recycles it. Concurrent callers queue on
/// the pool instead of the database lock. The database is lost when the pool
/// is dropped.
///
/// # Example
///
/// ```
/// use gallery_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .map_err(|e| Error::storage(format!("Failed to create in-memory pool: {}", e)))?;

    prepare(&pool)?;

    Ok(pool)
}

/// Run migrations on a connection from the pool.
fn prepare(pool: &DbPool) -> Result<()> {
    let conn = get_conn(pool)?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::storage(format!("Failed to run migrations: {}", e)))?;

    Ok(())
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type. Running out of connections within
/// the checkout timeout is a retryable storage failure.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::storage(format!("Failed to get connection from pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn test_get_conn() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_migrations_run_on_init() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='images'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_memory_pool_keeps_data_across_checkouts() {
        let pool = init_memory_pool().unwrap();

        {
            let conn = get_conn(&pool).unwrap();
            conn.execute(
                "INSERT INTO images (author, width, height, hash, path, url, mime_type)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params!["alice", 10, 10, vec![1u8], "p", "u", "image/png"],
            )
            .unwrap();
        }

        let conn = get_conn(&pool).unwrap();
        let author: String = conn
            .query_row("SELECT author FROM images WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(author, "alice");
    }

    #[test]
    fn test_file_pool_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let pool = init_pool(path.to_str().unwrap()).unwrap();
        assert_eq!(pool.max_size(), 4);

        let conn = get_conn(&pool).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_file_pool_reopens_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let path = path.to_str().unwrap();

        {
            let pool = init_pool(path).unwrap();
            let conn = get_conn(&pool).unwrap();
            conn.execute(
                "INSERT INTO images (author, width, height, hash, path, url, mime_type)
                 VALUES ('bob', 1, 1, x'ff', 'p', 'u', 'image/gif')",
                [],
            )
            .unwrap();
        }

        let pool = init_pool(path).unwrap();
        let conn = get_conn(&pool).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
