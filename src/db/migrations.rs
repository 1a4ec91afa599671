//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the currently applied schema version
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
}

/// Latest version this build knows about
pub const fn latest_version() -> i32 {
    SCHEMA_VERSION
}

/// Migration v1: clinic schema
///
/// Ids and creation timestamps are assigned by the store, never by the
/// caller. Column names are a fixed contract other tooling depends on.
/// `pacientes.nutricionista_id` is a reference, not an enforced foreign key.
fn migrate_v1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- NUTRICIONISTAS
        -- ============================================
        CREATE TABLE nutricionistas (
            id TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(16)))),
            nome TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            crn TEXT NOT NULL,
            telefone TEXT,
            especialidade TEXT,
            foto TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_nutricionistas_nome ON nutricionistas(nome);

        -- ============================================
        -- PACIENTES
        -- ============================================
        CREATE TABLE pacientes (
            id TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(16)))),
            nutricionista_id TEXT NOT NULL,
            nome TEXT NOT NULL,
            email TEXT NOT NULL,
            data_nascimento TEXT NOT NULL,            -- YYYY-MM-DD
            sexo TEXT NOT NULL CHECK(sexo IN ('masculino', 'feminino', 'outro')),
            telefone TEXT,
            endereco TEXT,
            observacoes TEXT,
            foto TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_pacientes_nome ON pacientes(nome);
        CREATE INDEX idx_pacientes_nutricionista ON pacientes(nutricionista_id);
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_store_assigns_id_and_timestamp() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO nutricionistas (nome, email, crn) VALUES ('Ana', 'ana@exemplo.com', 'CRN-1 11111')",
            [],
        )
        .unwrap();
        let (id, created_at): (String, String) = conn
            .query_row(
                "SELECT id, created_at FROM nutricionistas WHERE email = 'ana@exemplo.com'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(id.len(), 32);
        assert!(created_at.contains('T') && created_at.ends_with('Z'));
    }
}
