//! Meal plan model
//!
//! A plan is an ordered sequence of meals, each an ordered sequence of
//! items. At most one plan is expected to be active per patient; nothing
//! in this layer enforces that yet, a plan service would be the place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A prescribed meal plan for a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: String,
    pub paciente_id: String,
    pub nutricionista_id: String,
    pub titulo: String,
    pub data_inicio: NaiveDate,
    pub data_fim: Option<NaiveDate>,
    pub objetivo: String,
    pub refeicoes: Vec<Meal>,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

/// One meal within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub plano_alimentar_id: String,
    /// e.g. "Café da manhã", "Almoço"
    pub nome: String,
    /// e.g. "07:00"
    pub horario: String,
    pub alimentos: Vec<MealItem>,
}

/// One food entry within a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    pub id: String,
    pub refeicao_id: String,
    pub alimento: String,
    pub quantidade: f64,
    /// e.g. "g", "ml", "porção"
    pub unidade_medida: String,
    pub calorias: Option<f64>,
    pub proteinas: Option<f64>,
    pub carboidratos: Option<f64>,
    pub gorduras: Option<f64>,
    pub observacoes: Option<String>,
}
