//! Subcommands and the store options they share

pub mod ingredients;
pub mod migrate;
pub mod recipes;
pub mod seed;
pub mod users;

use ambrosia_core::logging_facility::Profile;
use ambrosia_core::QueryContext;
use ambrosia_store::{SqlitePool, StoreConfig};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Store location and per-query limits
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "AMBROSIA_DB_PATH", default_value = ".ambrosia/store.db")]
    pub db: PathBuf,

    /// Pooled connections
    #[arg(long, global = true, env = "AMBROSIA_POOL_SIZE", default_value_t = 4)]
    pub pool_size: usize,

    /// Per-command query deadline in milliseconds
    #[arg(long, global = true, env = "AMBROSIA_QUERY_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// How long a connection waits on a locked database, in milliseconds
    #[arg(long, global = true, env = "AMBROSIA_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// Log output format
    #[arg(
        long,
        global = true,
        env = "AMBROSIA_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

impl StoreArgs {
    pub fn config(&self) -> StoreConfig {
        StoreConfig::file(&self.db)
            .with_pool_size(self.pool_size)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }

    /// Open the store, creating its directory and schema when missing
    pub fn open(&self) -> anyhow::Result<SqlitePool> {
        if let Some(parent) = self.db.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(SqlitePool::open_migrated(&self.config())?)
    }

    pub fn context(&self) -> QueryContext {
        match self.timeout_ms {
            Some(ms) => QueryContext::new().with_timeout(Duration::from_millis(ms)),
            None => QueryContext::new(),
        }
    }
}

/// Print `value` to stdout as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        store: StoreArgs,
    }

    #[test]
    fn test_log_format_maps_to_profile() {
        let args = Harness::try_parse_from(["ambrosia", "--log-format", "json"]).unwrap();

        assert_eq!(args.store.log_format, LogFormat::Json);
        assert_eq!(Profile::from(args.store.log_format), Profile::Production);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let err = Harness::try_parse_from(["ambrosia", "--log-format", "xml"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_busy_timeout_reaches_store_config() {
        let args =
            Harness::try_parse_from(["ambrosia", "--db", "x.db", "--busy-timeout-ms", "250"])
                .unwrap();

        assert_eq!(args.store.config().busy_timeout, Duration::from_millis(250));
    }
}
