//! Diff-and-apply logic merging a submitted child list into a persisted
//! child collection.
//!
//! Given an author's persisted books and the submitted editable list, the
//! reconciler mutates the persisted collection in place so it matches the
//! submission, keeping identity-stable entities instead of deleting and
//! recreating them. Routing between "add" and "update" is decided purely
//! by classifying each submitted entry as [`Submitted::New`] (sentinel
//! identity) or [`Submitted::Existing`].
//!
//! The reconciler never touches the store. The caller commits afterwards;
//! a conflict aborts before any mutation has happened.

mod errors;
#[cfg(test)]
mod tests;

pub use errors::ReconcileError;

use std::collections::HashSet;

use crate::Result;
use crate::dynlist::DynamicList;
use crate::model::{EntityId, NEW_ID};

/// A child entity that can be reconciled against submitted drafts.
///
/// Implemented per child type; `Draft` is the editable representation the
/// form binder produces for it.
pub trait ReconcilableChild: Sized {
    type Draft;

    /// Persisted identity of this child.
    fn id(&self) -> EntityId;

    /// Identity carried by a submitted draft ([`NEW_ID`] when new).
    fn draft_id(draft: &Self::Draft) -> EntityId;

    /// Instantiate a new child from a draft. The store assigns the real
    /// identity at commit time.
    fn from_draft(draft: &Self::Draft) -> Self;

    /// Copy the mutable fields of a draft onto this child, leaving
    /// identity and ownership untouched. Returns whether anything
    /// actually changed.
    fn apply_draft(&mut self, draft: &Self::Draft) -> bool;
}

/// Classification of one submitted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted<'a, D> {
    /// Carries the sentinel identity; becomes a new child.
    New(&'a D),
    /// References a persisted child by identity.
    Existing(EntityId, &'a D),
}

/// Classify a draft by its identity sentinel.
pub fn classify<C: ReconcilableChild>(draft: &C::Draft) -> Submitted<'_, C::Draft> {
    match C::draft_id(draft) {
        NEW_ID => Submitted::New(draft),
        id => Submitted::Existing(id, draft),
    }
}

/// What a reconciliation did to the persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Children instantiated from sentinel-identity entries.
    pub added: usize,
    /// Children the submission no longer referenced.
    pub removed: usize,
    /// Children whose mutable fields actually changed.
    pub updated: usize,
}

impl ReconcileReport {
    /// True when the submission matched the persisted state exactly.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.updated == 0
    }
}

/// Mutate `persisted` in place to match `submitted`.
///
/// A persisted child is removed if and only if the submission no longer
/// references its identity; sentinel entries are added; matching entries
/// have their fields copied over. Submitting an empty list removes every
/// child.
///
/// Duplicate non-sentinel identities in the submission, or duplicate
/// identities among the persisted children, are data-integrity faults:
/// the call fails with a conflict and `persisted` is left unmutated.
///
/// A submitted identity with no persisted match is dropped silently:
/// that child was deleted by a concurrent edit, and concurrent edits are
/// resolved last-writer-wins.
pub fn reconcile<C: ReconcilableChild>(
    persisted: &mut Vec<C>,
    submitted: &DynamicList<C::Draft>,
) -> Result<ReconcileReport> {
    // Conflict checks run to completion before any mutation.
    let mut submitted_ids: HashSet<EntityId> = HashSet::new();
    for (_, draft) in submitted.iter() {
        if let Submitted::Existing(id, _) = classify::<C>(draft)
            && !submitted_ids.insert(id)
        {
            return Err(ReconcileError::DuplicateSubmittedId { id }.into());
        }
    }
    let mut persisted_ids: HashSet<EntityId> = HashSet::new();
    for child in persisted.iter() {
        if !persisted_ids.insert(child.id()) {
            return Err(ReconcileError::DuplicatePersistedId { id: child.id() }.into());
        }
    }

    let mut report = ReconcileReport::default();

    // Removals: everything the submission no longer references.
    let before = persisted.len();
    persisted.retain(|child| submitted_ids.contains(&child.id()));
    report.removed = before - persisted.len();

    // Additions and updates, in submission order. Additions end up after
    // the retained children, preserving the retained children's order.
    for (_, draft) in submitted.iter() {
        match classify::<C>(draft) {
            Submitted::New(draft) => {
                persisted.push(C::from_draft(draft));
                report.added += 1;
            }
            Submitted::Existing(id, draft) => {
                if let Some(child) = persisted.iter_mut().find(|c| c.id() == id)
                    && child.apply_draft(draft)
                {
                    report.updated += 1;
                }
            }
        }
    }

    Ok(report)
}
