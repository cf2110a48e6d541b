//! Store handle used by the query layer
//!
//! `QueryExecutor` is the seam between the query functions and whatever owns
//! the connections. `SqlitePool` is the SQLite implementation: a fixed set of
//! connections shared by all clones of the pool, safe to call from many
//! threads at once.

use crate::config::{StoreConfig, StoreLocation};
use crate::db;
use crate::errors::{query_error, Result};
use ambrosia_core::errors::{AmError, AmErrorKind};
use ambrosia_core::filter::FilterValue;
use ambrosia_core::QueryContext;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::Duration;

/// SQLite VM instructions between cancellation probes while a statement runs
const PROGRESS_OPS: i32 = 1_000;

/// Back-off while every pooled connection is busy
const ACQUIRE_BACKOFF: Duration = Duration::from_millis(1);

/// Parameterized, cancellation-aware query execution
pub trait QueryExecutor {
    /// Run `sql` with positional `args` and decode every row with `decode`.
    ///
    /// All rows are materialized before returning; the first failing row
    /// aborts the call and no partial result is returned.
    ///
    /// # Errors
    ///
    /// - `Cancelled` / `DeadlineExceeded`: `ctx` finished before or during the call
    /// - `Decode`: a row could not be mapped by `decode`
    /// - `Persistence`: the statement failed
    fn query_map<T, F>(
        &self,
        ctx: &QueryContext,
        sql: &str,
        args: &[FilterValue],
        decode: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn query_map<T, F>(
        &self,
        ctx: &QueryContext,
        sql: &str,
        args: &[FilterValue],
        decode: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        (**self).query_map(ctx, sql, args, decode)
    }
}

fn to_sql_value(value: &FilterValue) -> Value {
    match value {
        FilterValue::Text(s) => Value::Text(s.clone()),
        FilterValue::Integer(n) => Value::Integer(*n),
    }
}

struct PoolInner {
    conns: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

/// Fixed-size pool of SQLite connections
#[derive(Clone)]
pub struct SqlitePool {
    inner: Arc<PoolInner>,
}

impl std::fmt::Debug for SqlitePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePool")
            .field("size", &self.inner.conns.len())
            .finish()
    }
}

impl SqlitePool {
    /// Open `config.pool_size` configured connections
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let size = config.pool_size.max(1);
        let mut conns = Vec::with_capacity(size);

        match &config.location {
            StoreLocation::File(path) => {
                for _ in 0..size {
                    let conn = db::open(path)?;
                    db::configure(&conn, config.busy_timeout, true)?;
                    conns.push(conn);
                }
            }
            StoreLocation::Memory if size == 1 => {
                let conn = db::open_in_memory()?;
                db::configure(&conn, config.busy_timeout, false)?;
                conns.push(conn);
            }
            StoreLocation::Memory => {
                let name = format!("ambrosia-{}", uuid::Uuid::new_v4());
                for _ in 0..size {
                    let conn = db::open_shared_memory(&name)?;
                    db::configure(&conn, config.busy_timeout, false)?;
                    conns.push(conn);
                }
            }
        }

        tracing::debug!(pool_size = size, location = ?config.location, "sqlite pool opened");
        Ok(Self::from_connections(conns))
    }

    /// Open a pool and bring its schema up to date
    pub fn open_migrated(config: &StoreConfig) -> Result<Self> {
        let pool = Self::open(config)?;
        pool.migrate()?;
        Ok(pool)
    }

    /// Wrap already-opened connections
    pub fn from_connections(conns: Vec<Connection>) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                conns: conns.into_iter().map(Mutex::new).collect(),
                next: AtomicUsize::new(0),
            }),
        }
    }

    /// Single-connection pool around an existing connection
    pub fn from_connection(conn: Connection) -> Self {
        Self::from_connections(vec![conn])
    }

    pub fn size(&self) -> usize {
        self.inner.conns.len()
    }

    /// Apply pending schema migrations
    pub fn migrate(&self) -> Result<()> {
        self.with_connection(crate::migrations::apply_migrations)
    }

    /// Run `f` with exclusive access to one connection
    pub fn with_connection<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Connection) -> Result<R>,
    {
        let mut guard = match self.inner.conns[0].lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn acquire(&self, ctx: &QueryContext) -> Result<MutexGuard<'_, Connection>> {
        let conns = &self.inner.conns;
        if conns.is_empty() {
            return Err(AmError::new(AmErrorKind::Internal)
                .with_op("acquire_connection")
                .with_message("pool has no connections"));
        }

        let start = self.inner.next.fetch_add(1, Ordering::Relaxed) % conns.len();
        loop {
            for offset in 0..conns.len() {
                match conns[(start + offset) % conns.len()].try_lock() {
                    Ok(guard) => return Ok(guard),
                    Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                    Err(TryLockError::WouldBlock) => {}
                }
            }
            ctx.check("acquire_connection")?;
            std::thread::sleep(ACQUIRE_BACKOFF);
        }
    }
}

fn run_query<T, F>(
    conn: &Connection,
    ctx: &QueryContext,
    sql: &str,
    args: &[FilterValue],
    mut decode: F,
) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| query_error(e, ctx, "prepare_query"))?;

    let params = rusqlite::params_from_iter(args.iter().map(to_sql_value));
    let mut rows = stmt
        .query(params)
        .map_err(|e| query_error(e, ctx, "execute_query"))?;

    let mut out = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|e| query_error(e, ctx, "read_rows"))?
    {
        out.push(decode(row).map_err(|e| query_error(e, ctx, "decode_row"))?);
        ctx.check("read_rows")?;
    }

    Ok(out)
}

impl QueryExecutor for SqlitePool {
    fn query_map<T, F>(
        &self,
        ctx: &QueryContext,
        sql: &str,
        args: &[FilterValue],
        decode: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        ctx.check("execute_query")?;
        let conn = self.acquire(ctx)?;
        ctx.check("execute_query")?;

        conn.progress_handler(PROGRESS_OPS, Some(ctx.probe()));
        let result = run_query(&conn, ctx, sql, args, decode);
        conn.progress_handler(0, None::<fn() -> bool>);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_with_numbers() -> SqlitePool {
        let pool = SqlitePool::open(&StoreConfig::memory()).unwrap();
        pool.with_connection(|conn| {
            conn.execute_batch(
                "CREATE TABLE n (x INTEGER, label TEXT);
                 INSERT INTO n VALUES (1, 'one'), (2, 'two'), (3, 'three');",
            )
            .map_err(crate::errors::from_rusqlite)
        })
        .unwrap();
        pool
    }

    #[test]
    fn test_positional_dollar_placeholders_bind_in_order() {
        let pool = pool_with_numbers();
        let ctx = QueryContext::new();

        let labels: Vec<String> = pool
            .query_map(
                &ctx,
                "SELECT label FROM n WHERE x = $1 AND label = $2",
                &[FilterValue::Integer(2), FilterValue::from("two")],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(labels, vec!["two".to_string()]);
    }

    #[test]
    fn test_cancelled_context_rejected_before_query() {
        let pool = pool_with_numbers();
        let ctx = QueryContext::new();
        ctx.cancel();

        let err = pool
            .query_map(&ctx, "SELECT x FROM n", &[], |row| row.get::<_, i64>(0))
            .unwrap_err();
        assert_eq!(err.kind(), AmErrorKind::Cancelled);
    }

    #[test]
    fn test_cancel_between_rows_stops_iteration() {
        let pool = pool_with_numbers();
        let ctx = QueryContext::new();
        let mut seen = 0;

        let err = pool
            .query_map(&ctx, "SELECT x FROM n ORDER BY x", &[], |row| {
                seen += 1;
                ctx.cancel();
                row.get::<_, i64>(0)
            })
            .unwrap_err();

        assert_eq!(err.kind(), AmErrorKind::Cancelled);
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_long_statement_interrupted_by_deadline() {
        let pool = pool_with_numbers();
        let ctx = QueryContext::new().with_timeout(Duration::from_millis(20));

        // Unbounded recursive CTE: only the progress handler can stop it
        let err = pool
            .query_map(
                &ctx,
                "WITH RECURSIVE c(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM c)
                 SELECT count(*) FROM c",
                &[],
                |row| row.get::<_, i64>(0),
            )
            .unwrap_err();

        assert_eq!(err.kind(), AmErrorKind::DeadlineExceeded);
    }

    #[test]
    fn test_decode_failure_classified() {
        let pool = pool_with_numbers();
        let ctx = QueryContext::new();

        let err = pool
            .query_map(&ctx, "SELECT label FROM n", &[], |row| row.get::<_, i64>(0))
            .unwrap_err();
        assert_eq!(err.kind(), AmErrorKind::Decode);
        assert_eq!(err.op(), Some("decode_row"));
    }

    #[test]
    fn test_syntax_error_is_persistence() {
        let pool = pool_with_numbers();
        let ctx = QueryContext::new();

        let err = pool
            .query_map(&ctx, "SELEC x FROM n", &[], |row| row.get::<_, i64>(0))
            .unwrap_err();
        assert_eq!(err.kind(), AmErrorKind::Persistence);
    }

    #[test]
    fn test_shared_memory_pool_is_usable_from_threads() {
        let pool = SqlitePool::open(&StoreConfig::memory().with_pool_size(3)).unwrap();
        pool.with_connection(|conn| {
            conn.execute_batch("CREATE TABLE n (x INTEGER); INSERT INTO n VALUES (1), (2);")
                .map_err(crate::errors::from_rusqlite)
        })
        .unwrap();

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    let ctx = QueryContext::new();
                    pool.query_map(&ctx, "SELECT x FROM n ORDER BY x", &[], |row| {
                        row.get::<_, i64>(0)
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), vec![1, 2]);
        }
    }
}
