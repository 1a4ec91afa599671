//! Nutritionist model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Row, Value};
use crate::mapper::{self, FromRow, MalformedRow, Patch, ToRow};

/// A registered nutritionist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutritionist {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub crn: String,
    pub telefone: Option<String>,
    pub especialidade: Option<String>,
    pub foto: Option<String>,
    /// Set once at creation, immutable thereafter
    pub created_at: DateTime<Utc>,
}

impl FromRow for Nutritionist {
    fn from_row(row: &Row) -> Result<Self, MalformedRow> {
        Ok(Self {
            id: mapper::req_text(row, "id")?,
            nome: mapper::req_text(row, "nome")?,
            email: mapper::req_text(row, "email")?,
            crn: mapper::req_text(row, "crn")?,
            telefone: mapper::opt_text(row, "telefone")?,
            especialidade: mapper::opt_text(row, "especialidade")?,
            foto: mapper::opt_text(row, "foto")?,
            created_at: mapper::req_datetime(row, "created_at")?,
        })
    }
}

/// Data for creating a nutritionist (id and created_at are store-assigned)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionistCreate {
    pub nome: String,
    pub email: String,
    pub crn: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub especialidade: Option<String>,
    #[serde(default)]
    pub foto: Option<String>,
}

impl ToRow for NutritionistCreate {
    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("nome", Value::from(self.nome.clone())),
            ("email", Value::from(self.email.clone())),
            ("crn", Value::from(self.crn.clone())),
            ("telefone", Value::from(self.telefone.clone())),
            ("especialidade", Value::from(self.especialidade.clone())),
            ("foto", Value::from(self.foto.clone())),
        ]
    }
}

/// Partial update for a nutritionist
///
/// Required columns update through `Option` (present = set); optional
/// columns use `Patch` so a caller can clear them to NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionistPatch {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub crn: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub telefone: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub especialidade: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub foto: Patch<String>,
}

impl ToRow for NutritionistPatch {
    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = Vec::new();
        if let Some(nome) = &self.nome {
            cols.push(("nome", Value::from(nome.clone())));
        }
        if let Some(email) = &self.email {
            cols.push(("email", Value::from(email.clone())));
        }
        if let Some(crn) = &self.crn {
            cols.push(("crn", Value::from(crn.clone())));
        }
        if let Some(v) = self.telefone.as_value() {
            cols.push(("telefone", v));
        }
        if let Some(v) = self.especialidade.as_value() {
            cols.push(("especialidade", v));
        }
        if let Some(v) = self.foto.as_value() {
            cols.push(("foto", v));
        }
        cols
    }
}
