//! Reconciliation error types.

use thiserror::Error;

use crate::model::EntityId;

/// Data-integrity conflicts detected during reconciliation.
///
/// Either fault aborts the whole operation before any mutation; silently
/// picking one of the duplicates would corrupt the aggregate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Two submitted entries referenced the same persisted identity.
    #[error("Duplicate identity {id} among submitted entries")]
    DuplicateSubmittedId {
        /// The identity submitted more than once
        id: EntityId,
    },

    /// Two persisted children share an identity.
    #[error("Duplicate identity {id} among persisted children")]
    DuplicatePersistedId {
        /// The identity shared by more than one child
        id: EntityId,
    },
}

impl ReconcileError {
    /// All reconciliation errors are conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            ReconcileError::DuplicateSubmittedId { .. }
                | ReconcileError::DuplicatePersistedId { .. }
        )
    }
}

impl From<ReconcileError> for crate::Error {
    fn from(err: ReconcileError) -> Self {
        crate::Error::Reconcile(err)
    }
}
