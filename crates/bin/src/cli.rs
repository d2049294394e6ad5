//! CLI argument definitions for the bookbinder binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Storage backend type
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Backend {
    /// SQLite database file (default)
    Sqlite,
    /// In-memory with JSON persistence (for development and ephemeral deployments)
    Inmemory,
}

/// Bookbinder demo server: authors, books, and dynamic list editing
#[derive(Parser, Debug)]
#[command(name = "bookbinder")]
#[command(about = "Bookbinder: authors & books CRUD server with dynamic nested-list forms")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bookbinder web server
    Serve(ServeArgs),
    /// Check health of a running bookbinder server
    Health(HealthArgs),
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "BOOKBINDER_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "BOOKBINDER_HOST")]
    pub host: String,

    /// Storage backend to use
    #[arg(short, long, default_value = "sqlite", env = "BOOKBINDER_BACKEND")]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For SQLite: stores bookbinder.db
    /// For InMemory: stores bookbinder.json
    #[arg(short = 'D', long, env = "BOOKBINDER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seed demo authors on startup when the store is empty
    #[arg(long, env = "BOOKBINDER_SEED")]
    pub seed: bool,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "BOOKBINDER_URL")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}
