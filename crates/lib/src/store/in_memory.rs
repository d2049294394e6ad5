//! In-memory author store.
//!
//! Suitable for testing, development, or ephemeral deployments. Provides
//! basic persistence via `save_to_file` / `load_from_file`, serializing
//! the whole state to JSON.

use std::any::Any;
use std::collections::HashSet;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::{Author, Book, EntityId};
use crate::store::{AuthorStore, ChangeSet, PendingOp, StoreError};

/// Committed state: the aggregates plus the identity counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct State {
    next_author_id: EntityId,
    next_book_id: EntityId,
    authors: Vec<Author>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_author_id: 1,
            next_book_id: 1,
            authors: Vec::new(),
        }
    }
}

/// A simple in-memory store backed by a `RwLock`-guarded state.
///
/// `commit` applies the change set to a copy of the state and swaps it
/// in, so a failing commit leaves the committed state untouched. The
/// whole clone/apply/swap runs under the write lock: overlapping commits
/// serialize instead of overwriting each other's results.
#[derive(Debug, Default)]
pub struct InMemory {
    state: RwLock<State>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the committed state to a file as JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let state = self.state.read().expect("state lock poisoned").clone();
        let json = serde_json::to_string_pretty(&state)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a store from a JSON file written by `save_to_file`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let state: State = serde_json::from_str(&json)?;
        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

fn apply(state: &mut State, op: PendingOp) -> Result<()> {
    match op {
        PendingOp::Insert(mut author) => {
            author.id = state.next_author_id;
            state.next_author_id += 1;
            for book in &mut author.books {
                book.id = state.next_book_id;
                state.next_book_id += 1;
            }
            state.authors.push(author);
        }
        PendingOp::Update(mut author) => {
            let Some(slot) = state.authors.iter_mut().find(|a| a.id == author.id) else {
                return Err(StoreError::AuthorNotFound { id: author.id }.into());
            };
            // Books were already reconciled by the caller; here only the
            // new ones still need identities.
            for book in &mut author.books {
                if book.is_new() {
                    book.id = state.next_book_id;
                    state.next_book_id += 1;
                }
            }
            *slot = author;
        }
        PendingOp::Remove(id) => {
            state.authors.retain(|a| a.id != id);
        }
    }
    Ok(())
}

#[async_trait]
impl AuthorStore for InMemory {
    async fn fetch_all(&self) -> Result<Vec<Author>> {
        Ok(self.state.read().expect("state lock poisoned").authors.clone())
    }

    async fn fetch_with_books(&self, id: EntityId) -> Result<Option<Author>> {
        let state = self.state.read().expect("state lock poisoned");
        Ok(state.authors.iter().find(|a| a.id == id).cloned())
    }

    async fn fetch_book(&self, id: EntityId) -> Result<Option<Book>> {
        let state = self.state.read().expect("state lock poisoned");
        Ok(state
            .authors
            .iter()
            .flat_map(|a| a.books.iter())
            .find(|b| b.id == id)
            .cloned())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        // Apply to a copy and swap it back in, all under the write lock:
        // a failed op leaves the committed state untouched, and a
        // concurrent commit cannot start from a state this one is about
        // to replace.
        let mut guard = self.state.write().expect("state lock poisoned");
        let mut state = guard.clone();
        for op in changes.ops {
            apply(&mut state, op)?;
        }
        debug_assert!(unique_ids(&state), "commit produced duplicate identities");
        *guard = state;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn unique_ids(state: &State) -> bool {
    let mut author_ids = HashSet::new();
    let mut book_ids = HashSet::new();
    state.authors.iter().all(|a| {
        author_ids.insert(a.id) && a.books.iter().all(|b| book_ids.insert(b.id))
    })
}
