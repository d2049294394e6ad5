//! SQL schema definition and version tracking for the SQLite store.
//!
//! The schema is initialized in code when connecting. A `schema_version`
//! table records the version written by the build that created the file;
//! opening a database written by a newer build fails rather than
//! guessing at an unknown layout.

use sqlx::SqlitePool;

use crate::Result;
use crate::store::StoreError;
use crate::store::sqlite::SqlxResultExt;

/// Current schema version.
///
/// Increment this when making schema changes that require migration.
pub const SCHEMA_VERSION: i64 = 1;

/// SQL statements to create the schema tables.
pub const CREATE_TABLES: &[&str] = &[
    // Schema version tracking
    "CREATE TABLE IF NOT EXISTS schema_version (
        version BIGINT PRIMARY KEY
    )",
    // Parent aggregates
    "CREATE TABLE IF NOT EXISTS authors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL
    )",
    // Books owned by one author; publication_year is free text so
    // values like '500 b.c.' survive round trips
    "CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        publication_year TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id)",
];

/// Create tables if needed and check the stored schema version.
pub(crate) async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in CREATE_TABLES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .sql_context("creating schema tables")?;
    }

    let version: Option<i64> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await
            .sql_context("reading schema version")?;

    match version {
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES (?1)")
                .bind(SCHEMA_VERSION)
                .execute(pool)
                .await
                .sql_context("recording schema version")?;
            Ok(())
        }
        Some(found) if found > SCHEMA_VERSION => Err(StoreError::SchemaVersionTooNew {
            found,
            supported: SCHEMA_VERSION,
        }
        .into()),
        Some(_) => Ok(()),
    }
}
