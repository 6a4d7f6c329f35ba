//! Database module for SQLite persistence.
//!
//! SQLite holds the country border reference table. Everything else comes
//! from the remote API.

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

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create the schema if it does not exist yet.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS world_borders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            area INTEGER NOT NULL DEFAULT 0,
            pop2005 INTEGER NOT NULL DEFAULT 0,
            fips TEXT NOT NULL DEFAULT '',
            iso2 TEXT NOT NULL,
            iso3 TEXT NOT NULL DEFAULT '',
            un INTEGER NOT NULL DEFAULT 0,
            region INTEGER NOT NULL,
            subregion INTEGER NOT NULL,
            lon REAL NOT NULL DEFAULT 0,
            lat REAL NOT NULL DEFAULT 0,
            geometry TEXT NOT NULL DEFAULT ''
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_world_borders_iso2 ON world_borders(iso2);
        CREATE INDEX IF NOT EXISTS idx_world_borders_subregion ON world_borders(subregion);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
