//! Pluggable persistence for author aggregates.
//!
//! An [`AuthorStore`] is the page controller's only collaborator for
//! durable state. Mutations are collected in a per-request [`ChangeSet`]
//! and handed to [`commit`](AuthorStore::commit), which applies the whole
//! set atomically and is the single point where identities are assigned.
//! The store itself holds no uncommitted work: a change set that is
//! dropped without being committed is simply discarded, so an aborted
//! request leaves nothing half-applied and cannot leak work into another
//! request's commit.
//!
//! Two implementations are provided: [`InMemory`] (development and
//! tests, with optional JSON file persistence) and [`Sqlite`] (sqlx,
//! behind the `sqlite` feature).

mod errors;
pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use errors::StoreError;
pub use in_memory::InMemory;
#[cfg(feature = "sqlite")]
pub use sqlite::Sqlite;

use std::any::Any;

use async_trait::async_trait;

use crate::Result;
use crate::model::{Author, Book, EntityId};

/// One queued mutation, applied at commit time.
#[derive(Debug, Clone)]
pub(crate) enum PendingOp {
    /// Insert a new aggregate; author and new-book identities assigned
    /// at commit.
    Insert(Author),
    /// Replace an existing aggregate's fields and book collection.
    Update(Author),
    /// Remove an aggregate and the books it owns.
    Remove(EntityId),
}

/// Mutations collected by one request, committed in a single atomic step.
///
/// Each request builds its own change set and passes it to
/// [`AuthorStore::commit`]; the set is never shared between requests.
/// Dropping an uncommitted change set discards the work.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub(crate) ops: Vec<PendingOp>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue insertion of a new aggregate.
    pub fn add(&mut self, author: Author) {
        self.ops.push(PendingOp::Insert(author));
    }

    /// Queue an update of an existing aggregate. Books carrying the new
    /// sentinel get identities at commit; books missing from the
    /// aggregate are deleted at commit.
    pub fn mark_updated(&mut self, author: Author) {
        self.ops.push(PendingOp::Update(author));
    }

    /// Queue removal of an aggregate. Removing an id that is already
    /// gone is a no-op at commit (last writer wins).
    pub fn remove(&mut self, id: EntityId) {
        self.ops.push(PendingOp::Remove(id));
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Persistence collaborator for author aggregates.
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Fetch every author, books included, in stable id order.
    async fn fetch_all(&self) -> Result<Vec<Author>>;

    /// Fetch one author with their books, or `None` if the id is absent.
    async fn fetch_with_books(&self, id: EntityId) -> Result<Option<Author>>;

    /// Fetch one book by id, or `None` if absent.
    async fn fetch_book(&self, id: EntityId) -> Result<Option<Book>>;

    /// Apply every queued operation atomically. Updating an author that
    /// no longer exists fails the whole commit with
    /// [`StoreError::AuthorNotFound`] and applies nothing.
    async fn commit(&self, changes: ChangeSet) -> Result<()>;

    /// Downcasting hook so callers can reach backend-specific APIs
    /// (the binary saves the in-memory backend to a file at shutdown).
    fn as_any(&self) -> &dyn Any;
}
