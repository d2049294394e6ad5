//! Store creation from CLI configuration.

use std::path::PathBuf;
use std::sync::Arc;

use bookbinder::store::{AuthorStore, InMemory, Sqlite};

use crate::cli::{Backend, ServeArgs};

/// File name of the SQLite database under the data directory.
pub const SQLITE_FILE: &str = "bookbinder.db";
/// File name of the in-memory backend's JSON snapshot.
pub const JSON_FILE: &str = "bookbinder.json";

/// Create the appropriate store based on configuration
pub async fn create_store(args: &ServeArgs) -> Result<Arc<dyn AuthorStore>, Box<dyn std::error::Error>> {
    let data_dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir).await?;

    match args.backend {
        Backend::Sqlite => {
            let db_path = data_dir.join(SQLITE_FILE);
            tracing::info!("Using SQLite store at {}", db_path.display());
            Ok(Arc::new(Sqlite::open(&db_path).await?))
        }
        Backend::Inmemory => {
            let json_path = data_dir.join(JSON_FILE);
            tracing::info!(
                "Using in-memory store with persistence at {}",
                json_path.display()
            );
            match InMemory::load_from_file(&json_path) {
                Ok(store) => {
                    tracing::info!("Loaded existing data from {}", json_path.display());
                    Ok(Arc::new(store))
                }
                Err(_) => {
                    tracing::info!("Starting with a fresh store");
                    Ok(Arc::new(InMemory::new()))
                }
            }
        }
    }
}
