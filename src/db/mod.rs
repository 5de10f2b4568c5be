//! Database module for SQLite persistence.
//!
//! SQLite replaces the original clear-and-rewrite spreadsheet storage while
//! keeping the same two logical tables (`participantes`, `calendario`) with
//! their original column names as the compatibility boundary.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            schema_version INTEGER NOT NULL DEFAULT 1,
            revision_id INTEGER NOT NULL DEFAULT 0,
            generated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT OR IGNORE INTO meta (id, schema_version, revision_id, generated_at)
        VALUES (1, 1, 0, datetime('now'));
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participantes (
            id INTEGER PRIMARY KEY,
            nombre TEXT NOT NULL,
            fecha_cumple TEXT,
            telefono TEXT,
            email TEXT,
            notas TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS calendario (
            id INTEGER PRIMARY KEY,
            anio INTEGER NOT NULL,
            id_participante INTEGER NOT NULL,
            nombre_participante TEXT NOT NULL,
            fecha_pago TEXT NOT NULL,
            monto_por_persona TEXT NOT NULL,
            total_a_recibir TEXT NOT NULL,
            estatus TEXT NOT NULL DEFAULT 'Pendiente',
            fecha_pago_real TEXT,
            notas TEXT,
            pagos_detalle TEXT NOT NULL DEFAULT ''
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_calendario_anio ON calendario(anio);
        CREATE INDEX IF NOT EXISTS idx_calendario_fecha_pago ON calendario(fecha_pago);
        CREATE INDEX IF NOT EXISTS idx_participantes_nombre ON participantes(nombre);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
