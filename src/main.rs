//! NutriEvolve maintenance entry point
//!
//! Opens the configured database, applies migrations and reports the
//! current state of the clinic data.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use nutrievolve::db::{QueryExecutor, SqliteExecutor};
use nutrievolve::services::{NutritionistService, PatientService};

/// Get the database path from environment or use default
fn get_database_path() -> PathBuf {
    std::env::var("NUTRIEVOLVE_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = PathBuf::from("data");
            path.push("nutrievolve.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("nutrievolve=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_path = get_database_path();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let exec = Arc::new(SqliteExecutor::open(&db_path)?);
    let version = exec.migrate()?;
    eprintln!("Database schema version: {version}");

    let nutritionists = NutritionistService::new(exec.clone());
    let patients = PatientService::new(exec.clone());

    println!("Nutricionistas: {}", nutritionists.get_all()?.len());
    println!("Pacientes: {}", patients.get_all()?.len());

    exec.close()?;
    Ok(())
}
