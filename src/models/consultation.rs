//! Consultation model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Consultation status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultaStatus {
    Agendada,
    Concluida,
    Cancelada,
}

impl ConsultaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultaStatus::Agendada => "agendada",
            ConsultaStatus::Concluida => "concluida",
            ConsultaStatus::Cancelada => "cancelada",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "agendada" => Some(ConsultaStatus::Agendada),
            "concluida" => Some(ConsultaStatus::Concluida),
            "cancelada" => Some(ConsultaStatus::Cancelada),
            _ => None,
        }
    }
}

/// Consultation type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultaTipo {
    PrimeiraConsulta,
    Retorno,
    Avaliacao,
}

impl ConsultaTipo {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultaTipo::PrimeiraConsulta => "primeira_consulta",
            ConsultaTipo::Retorno => "retorno",
            ConsultaTipo::Avaliacao => "avaliacao",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "primeira_consulta" => Some(ConsultaTipo::PrimeiraConsulta),
            "retorno" => Some(ConsultaTipo::Retorno),
            "avaliacao" => Some(ConsultaTipo::Avaliacao),
            _ => None,
        }
    }
}

/// A scheduled or past consultation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: String,
    pub paciente_id: String,
    pub nutricionista_id: String,
    pub data: NaiveDate,
    /// Time of day, e.g. "14:30"
    pub horario: String,
    pub status: ConsultaStatus,
    pub tipo: ConsultaTipo,
    pub observacoes: Option<String>,
    /// Assessment taken during the visit, if any
    pub dados_antropometricos_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        for s in [
            ConsultaStatus::Agendada,
            ConsultaStatus::Concluida,
            ConsultaStatus::Cancelada,
        ] {
            assert_eq!(ConsultaStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(ConsultaStatus::parse("remarcada"), None);
    }

    #[test]
    fn test_tipo_wire_strings() {
        assert_eq!(ConsultaTipo::PrimeiraConsulta.as_str(), "primeira_consulta");
        assert_eq!(
            ConsultaTipo::parse("avaliacao"),
            Some(ConsultaTipo::Avaliacao)
        );
        assert_eq!(ConsultaTipo::parse(""), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let c = Consultation {
            id: "c1".to_string(),
            paciente_id: "p1".to_string(),
            nutricionista_id: "n1".to_string(),
            data: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            horario: "14:30".to_string(),
            status: ConsultaStatus::Agendada,
            tipo: ConsultaTipo::Retorno,
            observacoes: None,
            dados_antropometricos_id: None,
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains(r#""status":"agendada""#));
        assert!(json.contains(r#""tipo":"retorno""#));
        let back: Consultation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
