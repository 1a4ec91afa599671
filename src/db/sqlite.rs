//! SQLite backend
//!
//! Implements the query executor over a pooled SQLite database.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, OpenFlags, ToSql};

use super::executor::{ExecResult, QueryExecutor, QueryFailed, Row, RowSet, Value};
use super::migrations;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

fn value_from_sqlite(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

fn wrap(err: rusqlite::Error) -> QueryFailed {
    let constraint = matches!(
        &err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    );
    QueryFailed {
        source: Box::new(err),
        constraint,
    }
}

/// SQLite-backed query executor.
///
/// Holds the only live connection resource: an r2d2 pool created at `open`
/// and dropped exactly once at `close`. Concurrent callers are served by the
/// pool; each statement runs on its own pooled connection.
pub struct SqliteExecutor {
    pool: Mutex<Option<Pool<SqliteConnectionManager>>>,
}

impl SqliteExecutor {
    /// Open (or create) a database file and build the connection pool.
    pub fn open<P: AsRef<Path>>(path: P) -> ExecResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA foreign_keys = ON;
                     PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;",
                )?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(QueryFailed::from_cause)?;

        Ok(Self {
            pool: Mutex::new(Some(pool)),
        })
    }

    /// Open a private in-memory database, used by tests.
    ///
    /// The pool is capped at one connection so the database outlives
    /// individual statements.
    pub fn open_in_memory() -> ExecResult<Self> {
        // Distinct name per executor; shared cache keeps the database alive
        // across pooled connections.
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        let uri = format!("file:nutrievolve-mem-{n}?mode=memory&cache=shared");

        let manager = SqliteConnectionManager::file(uri)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|conn| {
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(QueryFailed::from_cause)?;

        Ok(Self {
            pool: Mutex::new(Some(pool)),
        })
    }

    fn get_conn(&self) -> ExecResult<PooledConnection<SqliteConnectionManager>> {
        let guard = self
            .pool
            .lock()
            .map_err(|_| QueryFailed::message("executor lock poisoned"))?;
        let pool = guard
            .as_ref()
            .ok_or_else(|| QueryFailed::message("executor is closed"))?;
        pool.get().map_err(QueryFailed::from_cause)
    }

    /// Bring the schema up to the current version. Returns the version.
    pub fn migrate(&self) -> ExecResult<i32> {
        let conn = self.get_conn()?;
        migrations::run_migrations(&conn).map_err(wrap)?;
        migrations::get_schema_version(&conn).map_err(wrap)
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, sql: &str, params: &[Value]) -> ExecResult<RowSet> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql).map_err(wrap)?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query(params_from_iter(params.iter())).map_err(wrap)?;
        let mut out = RowSet::new();
        while let Some(r) = rows.next().map_err(wrap)? {
            let mut row = Row::new();
            for (i, name) in columns.iter().enumerate() {
                let value = r.get_ref(i).map_err(wrap)?;
                row.insert(name.clone(), value_from_sqlite(value));
            }
            out.push(row);
        }
        Ok(out)
    }

    fn close(&self) -> ExecResult<()> {
        let mut guard = self
            .pool
            .lock()
            .map_err(|_| QueryFailed::message("executor lock poisoned"))?;
        // Dropping the pool closes every pooled connection; subsequent
        // closes are no-ops.
        guard.take();
        Ok(())
    }
}
