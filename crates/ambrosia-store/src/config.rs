//! Store configuration

use std::path::PathBuf;
use std::time::Duration;

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// Private in-memory database, shared by all connections of one pool
    Memory,
}

/// Connection pool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Number of pooled connections (at least 1)
    pub pool_size: usize,
    /// How long a connection waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
            ..Self::default()
        }
    }

    pub fn memory() -> Self {
        Self::default()
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: StoreLocation::Memory,
            pool_size: 1,
            busy_timeout: Duration::from_secs(5),
        }
    }
}
