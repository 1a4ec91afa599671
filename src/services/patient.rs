//! Patient service
//!
//! CRUD operations over the `pacientes` table. The nutritionist reference
//! on each patient is not validated against the `nutricionistas` table.

use std::sync::Arc;

use crate::db::{QueryExecutor, QueryFailed, Value};
use crate::mapper::{FromRow, ToRow};
use crate::models::{Patient, PatientCreate, PatientPatch};

use super::{
    insert_sql, update_sql, validate_email, validate_nome, write_error, ServiceError,
    ServiceResult,
};

/// CRUD service for patients
pub struct PatientService {
    exec: Arc<dyn QueryExecutor>,
}

impl PatientService {
    pub fn new(exec: Arc<dyn QueryExecutor>) -> Self {
        Self { exec }
    }

    /// All patients, ordered by name ascending.
    ///
    /// Ordering uses the store's default BINARY collation (case-sensitive,
    /// ordinal over UTF-8 bytes). The returned list is a snapshot: it is not
    /// kept fresh after a create/update/delete elsewhere.
    pub fn get_all(&self) -> ServiceResult<Vec<Patient>> {
        let rows = self
            .exec
            .execute("SELECT * FROM pacientes ORDER BY nome", &[])?;
        rows.iter()
            .map(|row| Patient::from_row(row).map_err(Into::into))
            .collect()
    }

    /// Patients of one nutritionist, ordered by name ascending.
    pub fn get_by_nutritionist(&self, nutricionista_id: &str) -> ServiceResult<Vec<Patient>> {
        let rows = self.exec.execute(
            "SELECT * FROM pacientes WHERE nutricionista_id = ?1 ORDER BY nome",
            &[Value::from(nutricionista_id)],
        )?;
        rows.iter()
            .map(|row| Patient::from_row(row).map_err(Into::into))
            .collect()
    }

    /// Fetch one patient; `None` when no row matches.
    pub fn get_by_id(&self, id: &str) -> ServiceResult<Option<Patient>> {
        let rows = self.exec.execute(
            "SELECT * FROM pacientes WHERE id = ?1",
            &[Value::from(id)],
        )?;
        match rows.first() {
            Some(row) => Ok(Some(Patient::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Insert a new patient; the store assigns id and created_at.
    pub fn create(&self, data: &PatientCreate) -> ServiceResult<Patient> {
        validate_nome(&data.nome)?;
        validate_email(&data.email)?;

        let (sql, params) = insert_sql("pacientes", data.columns());
        let rows = self.exec.execute(&sql, &params).map_err(write_error)?;
        let row = rows
            .first()
            .ok_or_else(|| QueryFailed::message("insert returned no row"))?;

        let created = Patient::from_row(row)?;
        tracing::debug!(id = %created.id, "created patient");
        Ok(created)
    }

    /// Apply only the fields present in the patch; everything else is left
    /// unchanged. Zero rows affected means the id does not exist.
    pub fn update(&self, id: &str, patch: &PatientPatch) -> ServiceResult<Patient> {
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }
        if let Some(nome) = &patch.nome {
            validate_nome(nome)?;
        }

        let cols = patch.columns();
        if cols.is_empty() {
            return self.get_by_id(id)?.ok_or(ServiceError::NotFound {
                entity: "patient",
                id: id.to_string(),
            });
        }

        let (sql, params) = update_sql("pacientes", cols, id);
        let rows = self.exec.execute(&sql, &params).map_err(write_error)?;
        match rows.first() {
            Some(row) => Ok(Patient::from_row(row)?),
            None => Err(ServiceError::NotFound {
                entity: "patient",
                id: id.to_string(),
            }),
        }
    }

    /// Hard delete. Deleting an id twice fails with NotFound the second
    /// time, never a crash.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let rows = self.exec.execute(
            "DELETE FROM pacientes WHERE id = ?1 RETURNING id",
            &[Value::from(id)],
        )?;
        if rows.is_empty() {
            return Err(ServiceError::NotFound {
                entity: "patient",
                id: id.to_string(),
            });
        }
        tracing::debug!(%id, "deleted patient");
        Ok(())
    }
}
