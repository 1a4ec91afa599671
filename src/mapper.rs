//! Field mapping
//!
//! Translation between the row representation (flat, snake_case columns,
//! dates as ISO-8601 strings) and the typed domain representation. Calendar
//! dates round-trip at day granularity, timestamps at second granularity.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::db::{Row, Value};

/// Wire format for calendar dates
pub const DATE_FMT: &str = "%Y-%m-%d";
/// Wire format for timestamps (UTC, second granularity)
pub const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A row violated the mapper's expectations. Fatal to the operation that
/// produced it, never silently defaulted.
#[derive(Debug, Error)]
pub enum MalformedRow {
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("column `{column}` has unexpected type")]
    WrongType { column: &'static str },

    #[error("column `{column}` holds unparseable date `{value}`")]
    BadDate {
        column: &'static str,
        value: String,
    },

    #[error("column `{column}` holds unknown variant `{value}`")]
    UnknownVariant {
        column: &'static str,
        value: String,
    },
}

/// Builds a domain object from one row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, MalformedRow>;
}

/// Produces the column/value pairs for the fields present in a payload.
///
/// Optional fields carried as `None` in a create payload map to explicit
/// NULLs; fields a patch leaves at `Keep` are omitted entirely, so they are
/// not touched by the update.
pub trait ToRow {
    fn columns(&self) -> Vec<(&'static str, Value)>;
}

// ============================================================================
// Date helpers
// ============================================================================

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format(DATETIME_FMT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).ok()
}

/// Parse a timestamp, accepting both the wire format and SQLite's
/// space-separated `datetime('now')` output.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    for fmt in [DATETIME_FMT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

// ============================================================================
// Typed column access
// ============================================================================

fn required<'a>(row: &'a Row, column: &'static str) -> Result<&'a Value, MalformedRow> {
    match row.get(column) {
        None | Some(Value::Null) => Err(MalformedRow::MissingColumn(column)),
        Some(v) => Ok(v),
    }
}

pub fn req_text(row: &Row, column: &'static str) -> Result<String, MalformedRow> {
    match required(row, column)? {
        Value::Text(s) => Ok(s.clone()),
        _ => Err(MalformedRow::WrongType { column }),
    }
}

pub fn opt_text(row: &Row, column: &'static str) -> Result<Option<String>, MalformedRow> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(s)) => Ok(Some(s.clone())),
        Some(_) => Err(MalformedRow::WrongType { column }),
    }
}

pub fn req_real(row: &Row, column: &'static str) -> Result<f64, MalformedRow> {
    match required(row, column)? {
        Value::Real(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        _ => Err(MalformedRow::WrongType { column }),
    }
}

pub fn opt_real(row: &Row, column: &'static str) -> Result<Option<f64>, MalformedRow> {
    match row.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Real(f)) => Ok(Some(*f)),
        Some(Value::Integer(i)) => Ok(Some(*i as f64)),
        Some(_) => Err(MalformedRow::WrongType { column }),
    }
}

pub fn req_date(row: &Row, column: &'static str) -> Result<NaiveDate, MalformedRow> {
    let text = req_text(row, column)?;
    parse_date(&text).ok_or(MalformedRow::BadDate {
        column,
        value: text,
    })
}

pub fn req_datetime(row: &Row, column: &'static str) -> Result<DateTime<Utc>, MalformedRow> {
    let text = req_text(row, column)?;
    parse_datetime(&text).ok_or(MalformedRow::BadDate {
        column,
        value: text,
    })
}

// ============================================================================
// Partial-update fields
// ============================================================================

/// Tri-state field for partial updates.
///
/// Distinguishes "key absent from the partial object" (`Keep`: the column is
/// not touched) from "key present with a null value" (`Clear`: the column is
/// set to NULL). On the wire, a missing JSON key deserializes to `Keep` (via
/// `#[serde(default)]` on the field) and an explicit `null` to `Clear`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Column value for this field, or `None` when the column is untouched.
    pub fn as_value(&self) -> Option<Value>
    where
        T: Clone + Into<Value>,
    {
        match self {
            Patch::Keep => None,
            Patch::Clear => Some(Value::Null),
            Patch::Set(v) => Some(v.clone().into()),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Keep | Patch::Clear => serializer.serialize_none(),
            Patch::Set(v) => serializer.serialize_some(v),
        }
    }
}
