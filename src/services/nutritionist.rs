//! Nutritionist service
//!
//! CRUD operations over the `nutricionistas` table.

use std::sync::Arc;

use crate::db::{QueryExecutor, QueryFailed, Value};
use crate::mapper::{FromRow, ToRow};
use crate::models::{Nutritionist, NutritionistCreate, NutritionistPatch};

use super::{
    insert_sql, update_sql, validate_email, validate_nome, write_error, ServiceError,
    ServiceResult,
};

/// CRUD service for nutritionists
pub struct NutritionistService {
    exec: Arc<dyn QueryExecutor>,
}

impl NutritionistService {
    pub fn new(exec: Arc<dyn QueryExecutor>) -> Self {
        Self { exec }
    }

    /// All nutritionists, ordered by name ascending.
    ///
    /// Ordering uses the store's default BINARY collation (case-sensitive,
    /// ordinal over UTF-8 bytes). The returned list is a snapshot: it is not
    /// kept fresh after a create/update/delete elsewhere.
    pub fn get_all(&self) -> ServiceResult<Vec<Nutritionist>> {
        let rows = self
            .exec
            .execute("SELECT * FROM nutricionistas ORDER BY nome", &[])?;
        rows.iter()
            .map(|row| Nutritionist::from_row(row).map_err(Into::into))
            .collect()
    }

    /// Fetch one nutritionist; `None` when no row matches.
    pub fn get_by_id(&self, id: &str) -> ServiceResult<Option<Nutritionist>> {
        let rows = self.exec.execute(
            "SELECT * FROM nutricionistas WHERE id = ?1",
            &[Value::from(id)],
        )?;
        match rows.first() {
            Some(row) => Ok(Some(Nutritionist::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Insert a new nutritionist; the store assigns id and created_at.
    pub fn create(&self, data: &NutritionistCreate) -> ServiceResult<Nutritionist> {
        validate_nome(&data.nome)?;
        validate_email(&data.email)?;

        let (sql, params) = insert_sql("nutricionistas", data.columns());
        let rows = self.exec.execute(&sql, &params).map_err(write_error)?;
        let row = rows
            .first()
            .ok_or_else(|| QueryFailed::message("insert returned no row"))?;

        let created = Nutritionist::from_row(row)?;
        tracing::debug!(id = %created.id, "created nutritionist");
        Ok(created)
    }

    /// Apply only the fields present in the patch; everything else is left
    /// unchanged. Zero rows affected means the id does not exist.
    pub fn update(&self, id: &str, patch: &NutritionistPatch) -> ServiceResult<Nutritionist> {
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }
        if let Some(nome) = &patch.nome {
            validate_nome(nome)?;
        }

        let cols = patch.columns();
        if cols.is_empty() {
            // Nothing to change; still report NotFound for a bad id
            return self.get_by_id(id)?.ok_or(ServiceError::NotFound {
                entity: "nutritionist",
                id: id.to_string(),
            });
        }

        let (sql, params) = update_sql("nutricionistas", cols, id);
        let rows = self.exec.execute(&sql, &params).map_err(write_error)?;
        match rows.first() {
            Some(row) => Ok(Nutritionist::from_row(row)?),
            None => Err(ServiceError::NotFound {
                entity: "nutritionist",
                id: id.to_string(),
            }),
        }
    }

    /// Hard delete. Deleting an id twice fails with NotFound the second
    /// time, never a crash.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let rows = self.exec.execute(
            "DELETE FROM nutricionistas WHERE id = ?1 RETURNING id",
            &[Value::from(id)],
        )?;
        if rows.is_empty() {
            return Err(ServiceError::NotFound {
                entity: "nutritionist",
                id: id.to_string(),
            });
        }
        tracing::debug!(%id, "deleted nutritionist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteExecutor;
    use crate::mapper::Patch;

    fn setup() -> NutritionistService {
        let exec = SqliteExecutor::open_in_memory().unwrap();
        exec.migrate().unwrap();
        NutritionistService::new(Arc::new(exec))
    }

    fn sample() -> NutritionistCreate {
        NutritionistCreate {
            nome: "Ana Souza".to_string(),
            email: "ana@exemplo.com".to_string(),
            crn: "CRN-3 12345".to_string(),
            telefone: Some("11 91234-5678".to_string()),
            especialidade: None,
            foto: None,
        }
    }

    #[test]
    fn test_create_then_get_by_id() {
        let svc = setup();
        let created = svc.create(&sample()).unwrap();
        assert!(!created.id.is_empty());

        let fetched = svc.get_by_id(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_by_id_absent_is_none_not_error() {
        let svc = setup();
        assert!(svc.get_by_id("nao-existe").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_is_validation_failure() {
        let svc = setup();
        svc.create(&sample()).unwrap();
        let err = svc
            .create(&NutritionistCreate {
                crn: "CRN-3 99999".to_string(),
                ..sample()
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationFailed(_)));
    }

    #[test]
    fn test_invalid_email_rejected_before_insert() {
        let svc = setup();
        let err = svc
            .create(&NutritionistCreate {
                email: "nao-e-email".to_string(),
                ..sample()
            })
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationFailed(_)));
        assert!(svc.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_get_all_sorted_by_nome() {
        let svc = setup();
        for (nome, email) in [
            ("João Pedro", "joao@exemplo.com"),
            ("Ana Souza", "ana@exemplo.com"),
            ("Carlos Lima", "carlos@exemplo.com"),
        ] {
            svc.create(&NutritionistCreate {
                nome: nome.to_string(),
                email: email.to_string(),
                crn: "CRN-3 00000".to_string(),
                telefone: None,
                especialidade: None,
                foto: None,
            })
            .unwrap();
        }
        let names: Vec<String> = svc.get_all().unwrap().into_iter().map(|n| n.nome).collect();
        assert_eq!(names, ["Ana Souza", "Carlos Lima", "João Pedro"]);
    }

    #[test]
    fn test_partial_update_is_field_scoped() {
        let svc = setup();
        let created = svc.create(&sample()).unwrap();

        let updated = svc
            .update(
                &created.id,
                &NutritionistPatch {
                    especialidade: Patch::Set("Nutrição esportiva".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.especialidade.as_deref(), Some("Nutrição esportiva"));
        // Untouched fields keep their values
        assert_eq!(updated.nome, created.nome);
        assert_eq!(updated.telefone, created.telefone);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_update_can_clear_optional_field() {
        let svc = setup();
        let created = svc.create(&sample()).unwrap();
        assert!(created.telefone.is_some());

        let updated = svc
            .update(
                &created.id,
                &NutritionistPatch {
                    telefone: Patch::Clear,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.telefone, None);
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let svc = setup();
        let err = svc
            .update(
                "nao-existe",
                &NutritionistPatch {
                    nome: Some("Novo Nome".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[test]
    fn test_empty_patch_returns_current_entity() {
        let svc = setup();
        let created = svc.create(&sample()).unwrap();
        let same = svc
            .update(&created.id, &NutritionistPatch::default())
            .unwrap();
        assert_eq!(same, created);

        let err = svc
            .update("nao-existe", &NutritionistPatch::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[test]
    fn test_delete_is_idempotent_failure() {
        let svc = setup();
        let created = svc.create(&sample()).unwrap();

        svc.delete(&created.id).unwrap();
        assert!(svc.get_by_id(&created.id).unwrap().is_none());

        let err = svc.delete(&created.id).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
