//! Database module
//!
//! Query execution interface, SQLite backend and migrations.

pub mod executor;
pub mod migrations;
pub mod sqlite;

pub use executor::{ExecResult, QueryExecutor, QueryFailed, Row, RowSet, Value};
pub use sqlite::SqliteExecutor;
