//! Anthropometric assessment model
//!
//! Measurements taken during a consultation, plus the derived indices
//! (IMC, RCQ). Derived values are computed by the caller through the
//! helpers here, never by the service layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Skinfold measurements, in millimeters (7 sub-sites)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DobrasCutaneas {
    pub tricipital: Option<f64>,
    pub subescapular: Option<f64>,
    pub bicipital: Option<f64>,
    pub suprailiaca: Option<f64>,
    pub abdominal: Option<f64>,
    pub coxa: Option<f64>,
    pub panturrilha: Option<f64>,
}

/// One anthropometric assessment of a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnthropometricRecord {
    pub id: String,
    pub paciente_id: String,
    pub data: NaiveDate,
    /// Weight in kg
    pub peso: f64,
    /// Height in cm
    pub altura: f64,
    /// Waist circumference in cm
    pub circunferencia_cintura: Option<f64>,
    /// Hip circumference in cm
    pub circunferencia_quadril: Option<f64>,
    /// Arm circumference in cm
    pub circunferencia_braco: Option<f64>,
    pub dobras_cutaneas: Option<DobrasCutaneas>,
    /// Body fat percentage
    pub percentual_gordura: Option<f64>,
    /// Body-mass index, from [`imc`]
    pub imc: Option<f64>,
    /// Waist-hip ratio, from [`rcq`]
    pub rcq: Option<f64>,
    /// Basal metabolic rate, kcal/day
    pub tmb: Option<f64>,
    pub observacoes: Option<String>,
}

/// Body-mass index: weight (kg) over height (m) squared.
///
/// Returns `None` when height is zero or negative, never infinity or NaN.
pub fn imc(peso_kg: f64, altura_cm: f64) -> Option<f64> {
    if altura_cm <= 0.0 || peso_kg < 0.0 {
        return None;
    }
    let altura_m = altura_cm / 100.0;
    Some(peso_kg / (altura_m * altura_m))
}

/// Waist-hip ratio. `None` when either circumference is absent or the hip
/// measurement is zero.
pub fn rcq(cintura_cm: Option<f64>, quadril_cm: Option<f64>) -> Option<f64> {
    let cintura = cintura_cm?;
    let quadril = quadril_cm?;
    if quadril <= 0.0 {
        return None;
    }
    Some(cintura / quadril)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imc_sample_values() {
        let v = imc(68.5, 165.0).unwrap();
        assert!((v - 25.16).abs() < 0.01);
        // One decimal, as displayed in assessments
        assert_eq!((v * 10.0).round() / 10.0, 25.2);
    }

    #[test]
    fn test_imc_zero_height_is_omitted() {
        assert_eq!(imc(68.5, 0.0), None);
        assert_eq!(imc(68.5, -1.0), None);
    }

    #[test]
    fn test_rcq() {
        let v = rcq(Some(72.0), Some(98.0)).unwrap();
        assert!((v - 0.7347).abs() < 0.001);
    }

    #[test]
    fn test_rcq_missing_or_zero_hip_is_omitted() {
        assert_eq!(rcq(Some(72.0), None), None);
        assert_eq!(rcq(None, Some(98.0)), None);
        assert_eq!(rcq(Some(72.0), Some(0.0)), None);
    }

    #[test]
    fn test_wire_names() {
        let record = AnthropometricRecord {
            id: "a1".to_string(),
            paciente_id: "p1".to_string(),
            data: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            peso: 68.5,
            altura: 165.0,
            circunferencia_cintura: Some(72.0),
            circunferencia_quadril: Some(98.0),
            circunferencia_braco: None,
            dobras_cutaneas: Some(DobrasCutaneas {
                tricipital: Some(14.0),
                ..Default::default()
            }),
            percentual_gordura: None,
            imc: imc(68.5, 165.0),
            rcq: rcq(Some(72.0), Some(98.0)),
            tmb: None,
            observacoes: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("pacienteId").is_some());
        assert!(json.get("circunferenciaCintura").is_some());
        assert!(json.get("dobrasCutaneas").is_some());
    }
}
