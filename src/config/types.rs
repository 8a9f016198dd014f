use gallery_db::pool::PoolOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Path value that selects a throwaway in-memory catalog.
pub const MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file, or ":memory:"
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Maximum number of pooled connections
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// How long a statement waits on a locked database (milliseconds)
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,

    /// How long to wait for a free pooled connection (milliseconds)
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("gallery.db")
}
fn default_pool_size() -> u32 {
    4
}
fn default_busy_timeout() -> u64 {
    5000
}
fn default_connection_timeout() -> u64 {
    30_000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout(),
            connection_timeout_ms: default_connection_timeout(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_DATABASE
    }

    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_size: self.pool_size,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            connection_timeout: Duration::from_millis(self.connection_timeout_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingConfig {
    /// Page size used by `list` when none is given
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Largest page `list` will return
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_limit() -> u32 {
    10
}
fn default_max_limit() -> u32 {
    100
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}
