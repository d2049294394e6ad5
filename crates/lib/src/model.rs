//! Persisted entity types: authors and the books they own.

use serde::{Deserialize, Serialize};

/// Identity assigned by the persistence layer.
pub type EntityId = i64;

/// Sentinel identity for records that have not been persisted yet.
///
/// New books arrive from the edit form with this id; the store assigns a
/// real identity at commit time.
pub const NEW_ID: EntityId = 0;

/// A book, owned exclusively by one author.
///
/// `publication_year` is deliberately free text so approximate or
/// historical dates like "500 b.c." remain representable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub publication_year: String,
}

impl Book {
    /// Create a not-yet-persisted book.
    pub fn new(title: impl Into<String>, publication_year: impl Into<String>) -> Self {
        Self {
            id: NEW_ID,
            title: title.into(),
            publication_year: publication_year.into(),
        }
    }

    /// Whether this book still needs an identity from the store.
    pub fn is_new(&self) -> bool {
        self.id == NEW_ID
    }
}

/// An author together with the ordered collection of books they own.
///
/// Deleting the author deletes the books; books are never shared between
/// authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub books: Vec<Book>,
}

impl Author {
    /// Create a not-yet-persisted author with no books.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: NEW_ID,
            first_name: first_name.into(),
            last_name: last_name.into(),
            books: Vec::new(),
        }
    }

    /// Display name in "First Last" order.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
