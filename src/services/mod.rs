//! Entity services
//!
//! Per-entity CRUD over the query executor. Services hold an injected
//! executor handle and never reach for ambient state; every call is one
//! independent request/response round trip with no retry logic.

mod nutritionist;
mod patient;

pub use nutritionist::NutritionistService;
pub use patient::PatientService;

use thiserror::Error;

use crate::db::{QueryFailed, Value};
use crate::mapper::MalformedRow;

/// Service error taxonomy
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport or backend failure, cause preserved
    #[error(transparent)]
    QueryFailed(#[from] QueryFailed),

    /// A returned row violated the mapper's expectations
    #[error(transparent)]
    MalformedRow(#[from] MalformedRow),

    /// Store-level constraint rejection or a pre-insert validation failure
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Operation targeted a nonexistent id
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a write failure: constraint rejections (duplicate email, NOT NULL)
/// become validation failures, everything else stays a query failure.
pub(crate) fn write_error(err: QueryFailed) -> ServiceError {
    if err.constraint {
        ServiceError::ValidationFailed(err.to_string())
    } else {
        ServiceError::QueryFailed(err)
    }
}

/// Minimal email shape check; uniqueness stays the store's concern.
pub(crate) fn validate_email(email: &str) -> ServiceResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(format!(
            "invalid email: {email}"
        )))
    }
}

pub(crate) fn validate_nome(nome: &str) -> ServiceResult<()> {
    if nome.trim().is_empty() {
        return Err(ServiceError::ValidationFailed(
            "nome cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Build `INSERT INTO <table> (...) VALUES (...) RETURNING *` for the given
/// column/value pairs.
pub(crate) fn insert_sql(
    table: &str,
    cols: Vec<(&'static str, Value)>,
) -> (String, Vec<Value>) {
    let names: Vec<&str> = cols.iter().map(|(c, _)| *c).collect();
    let placeholders: Vec<String> = (1..=cols.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        table,
        names.join(", "),
        placeholders.join(", ")
    );
    let params = cols.into_iter().map(|(_, v)| v).collect();
    (sql, params)
}

/// Build `UPDATE <table> SET ... WHERE id = ? RETURNING *` touching only the
/// given columns; the id binds as the last parameter.
pub(crate) fn update_sql(
    table: &str,
    cols: Vec<(&'static str, Value)>,
    id: &str,
) -> (String, Vec<Value>) {
    let assignments: Vec<String> = cols
        .iter()
        .enumerate()
        .map(|(i, (c, _))| format!("{} = ?{}", c, i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{} RETURNING *",
        table,
        assignments.join(", "),
        cols.len() + 1
    );
    let mut params: Vec<Value> = cols.into_iter().map(|(_, v)| v).collect();
    params.push(Value::from(id));
    (sql, params)
}
