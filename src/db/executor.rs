//! Query execution interface
//!
//! A backend-agnostic contract for issuing parameterized statements and
//! receiving uniform row results. Entity services depend only on this
//! interface, so the backing store can be swapped without touching them.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::mapper;

/// Raw column value as produced by a backing store or bound as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Text(mapper::format_date(d))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Text(mapper::format_datetime(dt))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// One record as returned by the backing store, keyed by column name.
#[derive(Debug, Clone, Default)]
pub struct Row {
    columns: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<C: Into<String>, V: Into<Value>> FromIterator<(C, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (c, v) in iter {
            row.insert(c, v);
        }
        row
    }
}

/// Ordered sequence of rows returned by one statement.
pub type RowSet = Vec<Row>;

/// Transport or backend failure, with the original cause preserved.
///
/// The executor never interprets backend errors beyond this wrapper; the
/// `constraint` flag records whether the cause was a store-level constraint
/// rejection so the service layer can surface it as a validation failure.
#[derive(Debug, Error)]
#[error("query failed: {source}")]
pub struct QueryFailed {
    #[source]
    pub source: Box<dyn Error + Send + Sync>,
    pub constraint: bool,
}

impl QueryFailed {
    /// Wrap an arbitrary backend error.
    pub fn from_cause(source: impl Error + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            constraint: false,
        }
    }

    /// Build from a plain message, for failures without an underlying error.
    pub fn message(msg: impl fmt::Display) -> Self {
        Self {
            source: msg.to_string().into(),
            constraint: false,
        }
    }
}

/// Result type for executor operations
pub type ExecResult<T> = Result<T, QueryFailed>;

/// Narrow interface over the backing store.
///
/// `execute` accepts a statement template with positional placeholders and a
/// matching parameter list; a mismatched count is a backend error surfaced
/// as `QueryFailed`. Write statements that need the affected rows back use
/// RETURNING, so server-assigned ids and timestamps come through the same
/// uniform row shape. A failed write leaves no row behind: single statements
/// are atomic in every supported backend.
pub trait QueryExecutor: Send + Sync {
    /// Execute one statement and return all resulting rows (possibly empty).
    fn execute(&self, sql: &str, params: &[Value]) -> ExecResult<RowSet>;

    /// Release the underlying connection resource.
    ///
    /// Idempotent; `execute` after `close` fails with `QueryFailed`.
    fn close(&self) -> ExecResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(
            Value::from(Some("oi".to_string())),
            Value::Text("oi".to_string())
        );
    }

    #[test]
    fn test_value_from_date() {
        let d = NaiveDate::from_ymd_opt(1990, 5, 15).unwrap();
        assert_eq!(Value::from(d), Value::Text("1990-05-15".to_string()));
    }

    #[test]
    fn test_row_access() {
        let row: Row = [("nome", "Ana"), ("email", "ana@exemplo.com")]
            .into_iter()
            .collect();
        assert_eq!(row.get("nome"), Some(&Value::Text("Ana".to_string())));
        assert_eq!(row.get("telefone"), None);
    }
}
