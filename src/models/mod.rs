//! Data models
//!
//! Rust structs representing clinic entities.

mod anthropometry;
mod consultation;
mod meal_plan;
mod nutritionist;
mod patient;

pub use anthropometry::{imc, rcq, AnthropometricRecord, DobrasCutaneas};
pub use consultation::{ConsultaStatus, ConsultaTipo, Consultation};
pub use meal_plan::{Meal, MealItem, MealPlan};
pub use nutritionist::{Nutritionist, NutritionistCreate, NutritionistPatch};
pub use patient::{Patient, PatientCreate, PatientPatch, Sexo};
