//! Store error types.

use thiserror::Error;

use crate::model::EntityId;

/// Errors that can occur during persistence operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// Author not found by id.
    #[error("Author not found: {id}")]
    AuthorNotFound {
        /// The id of the author that was not found
        id: EntityId,
    },

    /// sqlx operation failed.
    #[cfg(feature = "sqlite")]
    #[error("Database error: {reason}")]
    Sqlx {
        /// Context description plus the driver error
        reason: String,
        /// Original sqlx error, when available
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Stored schema is newer than this build understands.
    #[cfg(feature = "sqlite")]
    #[error("Schema version {found} is newer than supported version {supported}")]
    SchemaVersionTooNew {
        /// Version found in the database
        found: i64,
        /// Highest version this build supports
        supported: i64,
    },
}

impl StoreError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::AuthorNotFound { .. })
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
