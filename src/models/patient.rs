//! Patient model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Row, Value};
use crate::mapper::{self, FromRow, MalformedRow, Patch, ToRow};

/// Biological sex enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sexo {
    Masculino,
    Feminino,
    Outro,
}

impl Sexo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sexo::Masculino => "masculino",
            Sexo::Feminino => "feminino",
            Sexo::Outro => "outro",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "masculino" => Some(Sexo::Masculino),
            "feminino" => Some(Sexo::Feminino),
            "outro" => Some(Sexo::Outro),
            _ => None,
        }
    }
}

impl From<Sexo> for Value {
    fn from(sexo: Sexo) -> Self {
        Value::Text(sexo.as_str().to_string())
    }
}

/// A patient; belongs logically to one nutritionist, though the reference
/// is not enforced at the store level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub nutricionista_id: String,
    pub nome: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub sexo: Sexo,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub observacoes: Option<String>,
    pub foto: Option<String>,
    /// Set once at creation, immutable thereafter
    pub created_at: DateTime<Utc>,
}

impl FromRow for Patient {
    fn from_row(row: &Row) -> Result<Self, MalformedRow> {
        let sexo_text = mapper::req_text(row, "sexo")?;
        let sexo = Sexo::parse(&sexo_text).ok_or(MalformedRow::UnknownVariant {
            column: "sexo",
            value: sexo_text,
        })?;

        Ok(Self {
            id: mapper::req_text(row, "id")?,
            nutricionista_id: mapper::req_text(row, "nutricionista_id")?,
            nome: mapper::req_text(row, "nome")?,
            email: mapper::req_text(row, "email")?,
            data_nascimento: mapper::req_date(row, "data_nascimento")?,
            sexo,
            telefone: mapper::opt_text(row, "telefone")?,
            endereco: mapper::opt_text(row, "endereco")?,
            observacoes: mapper::opt_text(row, "observacoes")?,
            foto: mapper::opt_text(row, "foto")?,
            created_at: mapper::req_datetime(row, "created_at")?,
        })
    }
}

/// Data for creating a patient (id and created_at are store-assigned)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientCreate {
    pub nutricionista_id: String,
    pub nome: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub sexo: Sexo,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub foto: Option<String>,
}

impl ToRow for PatientCreate {
    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("nutricionista_id", Value::from(self.nutricionista_id.clone())),
            ("nome", Value::from(self.nome.clone())),
            ("email", Value::from(self.email.clone())),
            ("data_nascimento", Value::from(self.data_nascimento)),
            ("sexo", Value::from(self.sexo)),
            ("telefone", Value::from(self.telefone.clone())),
            ("endereco", Value::from(self.endereco.clone())),
            ("observacoes", Value::from(self.observacoes.clone())),
            ("foto", Value::from(self.foto.clone())),
        ]
    }
}

/// Partial update for a patient
///
/// Required columns update through `Option` (present = set); optional
/// columns use `Patch` so a caller can clear them to NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPatch {
    pub nutricionista_id: Option<String>,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub sexo: Option<Sexo>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub telefone: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub endereco: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub observacoes: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub foto: Patch<String>,
}

impl ToRow for PatientPatch {
    fn columns(&self) -> Vec<(&'static str, Value)> {
        let mut cols = Vec::new();
        if let Some(nid) = &self.nutricionista_id {
            cols.push(("nutricionista_id", Value::from(nid.clone())));
        }
        if let Some(nome) = &self.nome {
            cols.push(("nome", Value::from(nome.clone())));
        }
        if let Some(email) = &self.email {
            cols.push(("email", Value::from(email.clone())));
        }
        if let Some(data) = self.data_nascimento {
            cols.push(("data_nascimento", Value::from(data)));
        }
        if let Some(sexo) = self.sexo {
            cols.push(("sexo", Value::from(sexo)));
        }
        if let Some(v) = self.telefone.as_value() {
            cols.push(("telefone", v));
        }
        if let Some(v) = self.endereco.as_value() {
            cols.push(("endereco", v));
        }
        if let Some(v) = self.observacoes.as_value() {
            cols.push(("observacoes", v));
        }
        if let Some(v) = self.foto.as_value() {
            cols.push(("foto", v));
        }
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_create() -> PatientCreate {
        PatientCreate {
            nutricionista_id: "1".to_string(),
            nome: "Maria Silva".to_string(),
            email: "maria@exemplo.com".to_string(),
            data_nascimento: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            sexo: Sexo::Feminino,
            telefone: Some("11 98765-4321".to_string()),
            endereco: Some("Rua das Flores, 100".to_string()),
            observacoes: Some("Intolerância à lactose".to_string()),
            foto: None,
        }
    }

    fn row_from(create: &PatientCreate) -> Row {
        let mut row: Row = create.columns().into_iter().collect();
        row.insert("id", "p1");
        row.insert("created_at", "2024-03-01T09:30:00Z");
        row
    }

    #[test]
    fn test_round_trip_all_fields_present() {
        let create = sample_create();
        let p = Patient::from_row(&row_from(&create)).unwrap();
        assert_eq!(p.nutricionista_id, create.nutricionista_id);
        assert_eq!(p.nome, create.nome);
        assert_eq!(p.data_nascimento, create.data_nascimento);
        assert_eq!(p.sexo, Sexo::Feminino);
        assert_eq!(p.telefone, create.telefone);
        assert_eq!(p.endereco, create.endereco);
        assert_eq!(p.observacoes, create.observacoes);
    }

    #[test]
    fn test_round_trip_optionals_absent() {
        let create = PatientCreate {
            telefone: None,
            endereco: None,
            observacoes: None,
            foto: None,
            ..sample_create()
        };
        let p = Patient::from_row(&row_from(&create)).unwrap();
        assert_eq!(p.telefone, None);
        assert_eq!(p.endereco, None);
        assert_eq!(p.observacoes, None);
        assert_eq!(p.foto, None);
    }

    #[test]
    fn test_unknown_sexo_is_malformed() {
        let mut row = row_from(&sample_create());
        row.insert("sexo", "desconhecido");
        assert!(matches!(
            Patient::from_row(&row),
            Err(MalformedRow::UnknownVariant { column: "sexo", .. })
        ));
    }

    #[test]
    fn test_create_deserializes_from_wire_names() {
        let create: PatientCreate = serde_json::from_str(
            r#"{
                "nutricionistaId": "1",
                "nome": "Maria Silva",
                "email": "maria@exemplo.com",
                "dataNascimento": "1990-05-15",
                "sexo": "feminino"
            }"#,
        )
        .unwrap();
        assert_eq!(create.nutricionista_id, "1");
        assert_eq!(
            create.data_nascimento,
            NaiveDate::from_ymd_opt(1990, 5, 15).unwrap()
        );
        assert_eq!(create.sexo, Sexo::Feminino);
        assert_eq!(create.telefone, None);
    }

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        let patch: PatientPatch =
            serde_json::from_str(r#"{"nome": "Maria S. Santos", "observacoes": null}"#).unwrap();
        let cols = patch.columns();
        assert_eq!(
            cols,
            vec![
                ("nome", Value::Text("Maria S. Santos".to_string())),
                ("observacoes", Value::Null),
            ]
        );
    }
}
