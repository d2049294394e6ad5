//! Bookbinder: a demonstration CRUD core for managing authors and their
//! authored books, built around a dynamic nested-list form-editing pattern
//! (adding and removing books inside an author form without page reloads).
//!
//! ## Core Concepts
//!
//! * **Entities (`model::Author`, `model::Book`)**: persisted records with
//!   integer identities. A book's lifetime is owned by its author.
//! * **Editable lists (`dynlist::DynamicList`)**: a per-request projection
//!   pairing each editable child with a positional key, so two blank books
//!   added in the same render stay distinguishable before either has an id.
//! * **Forms (`form::AuthorForm`, `form::BookForm`)**: non-persisted,
//!   form-bindable projections of the entities, bound from urlencoded pairs.
//! * **Reconciliation (`reconcile`)**: diffs a submitted editable list
//!   against the persisted children and applies adds/removes/updates in
//!   place, without touching storage.
//! * **Stores (`store::AuthorStore`)**: pluggable persistence applying a
//!   per-request `store::ChangeSet` in a single atomic commit. In-memory
//!   and SQLite backends are provided.

pub mod dynlist;
pub mod form;
pub mod fragment;
pub mod model;
pub mod reconcile;
pub mod seed;
pub mod store;

pub use dynlist::{DynamicList, ItemKey};
pub use model::{Author, Book, EntityId, NEW_ID};

/// Result type used throughout the bookbinder library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the bookbinder library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured persistence errors from the store module
    #[error(transparent)]
    Store(store::StoreError),

    /// Structured form binding errors from the form module
    #[error(transparent)]
    Form(form::FormError),

    /// Structured reconciliation errors from the reconcile module
    #[error(transparent)]
    Reconcile(reconcile::ReconcileError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Store(_) => "store",
            Error::Form(_) => "form",
            Error::Reconcile(_) => "reconcile",
        }
    }

    /// Check if this error indicates a requested record was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a data-integrity conflict.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Reconcile(reconcile_err) => reconcile_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error came from a malformed form submission.
    pub fn is_bind_error(&self) -> bool {
        matches!(self, Error::Form(_))
    }
}
