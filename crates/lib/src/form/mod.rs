//! Form-bindable projections of the entities and the binding that turns
//! a submitted urlencoded body back into them.
//!
//! Field naming follows the dynamic-list convention rendered into the
//! pages: scalar author fields by name (`first_name`), book fields
//! prefixed with the positional key (`books[3].title`). The key in the
//! prefix is the [`ItemKey`] of the entry, never the book's persisted id.

mod errors;

pub use errors::FormError;

use std::collections::HashMap;

use crate::dynlist::{DynamicList, ItemKey};
use crate::model::{Author, Book, EntityId, NEW_ID};
use crate::reconcile::ReconcilableChild;
use crate::Result;

/// Editable representation of a [`Book`], the unit of client-side editing.
///
/// Carries the same identity as the book it projects, or [`NEW_ID`] for a
/// book that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookForm {
    pub id: EntityId,
    pub title: String,
    pub publication_year: String,
}

impl BookForm {
    /// A freshly initialized blank book, used by the dynamic-item provider.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_book(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            publication_year: book.publication_year.clone(),
        }
    }

    pub fn to_book(&self) -> Book {
        Book {
            id: self.id,
            title: self.title.clone(),
            publication_year: self.publication_year.clone(),
        }
    }
}

impl ReconcilableChild for Book {
    type Draft = BookForm;

    fn id(&self) -> EntityId {
        self.id
    }

    fn draft_id(draft: &BookForm) -> EntityId {
        draft.id
    }

    fn from_draft(draft: &BookForm) -> Self {
        draft.to_book()
    }

    fn apply_draft(&mut self, draft: &BookForm) -> bool {
        let changed = self.title != draft.title || self.publication_year != draft.publication_year;
        self.title = draft.title.clone();
        self.publication_year = draft.publication_year.clone();
        changed
    }
}

/// Editable representation of an [`Author`] with its dynamic book list.
#[derive(Debug, Clone, Default)]
pub struct AuthorForm {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub books: DynamicList<BookForm>,
}

/// One field-level validation message, keyed by the form field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl AuthorForm {
    /// A blank form for the create page.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_author(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            books: DynamicList::from_persisted(&author.books, BookForm::from_book),
        }
    }

    /// Materialize a full aggregate from the form, for the create flow.
    pub fn to_author(&self) -> Author {
        Author {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            books: self.books.to_persisted(BookForm::to_book),
        }
    }

    /// Check declared field constraints, returning one message per
    /// violation. An empty result means the form may be persisted.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.first_name.trim().is_empty() {
            errors.push(FieldError {
                field: "first_name".to_string(),
                message: "First name is required".to_string(),
            });
        }
        if self.last_name.trim().is_empty() {
            errors.push(FieldError {
                field: "last_name".to_string(),
                message: "Last name is required".to_string(),
            });
        }
        for (key, book) in self.books.iter() {
            if book.title.trim().is_empty() {
                errors.push(FieldError {
                    field: format!("books[{key}].title"),
                    message: "Title is required".to_string(),
                });
            }
        }
        errors
    }
}

/// Book subfields accepted inside a `books[key].field` name.
const BOOK_FIELDS: [&str; 3] = ["id", "title", "publication_year"];

/// Bind a submitted urlencoded body (as name/value pairs, in submission
/// order) into an [`AuthorForm`].
///
/// Unknown scalar fields (such as the anti-forgery token) are ignored.
/// Malformed ids, malformed list field names, or a field repeated for the
/// same positional key fail with [`FormError`].
pub fn bind_author_form(pairs: &[(String, String)]) -> Result<AuthorForm> {
    let mut form = AuthorForm::blank();
    // Drafts under construction, plus first-appearance order of keys.
    let mut drafts: HashMap<u64, BookForm> = HashMap::new();
    let mut seen_fields: HashMap<(u64, &str), ()> = HashMap::new();
    let mut order: Vec<u64> = Vec::new();

    for (name, value) in pairs {
        match name.as_str() {
            "id" => form.id = parse_id(name, value)?,
            "first_name" => form.first_name = value.clone(),
            "last_name" => form.last_name = value.clone(),
            other => {
                let Some((key, field)) = parse_list_field(other) else {
                    if other.starts_with("books[") {
                        return Err(FormError::MalformedListField {
                            name: other.to_string(),
                        }
                        .into());
                    }
                    // Unknown scalar field, e.g. csrf_token.
                    continue;
                };
                if seen_fields.insert((key, field), ()).is_some() {
                    return Err(FormError::DuplicateField {
                        name: other.to_string(),
                    }
                    .into());
                }
                let draft = drafts.entry(key).or_insert_with(|| {
                    order.push(key);
                    BookForm::blank()
                });
                match field {
                    "id" => draft.id = parse_id(other, value)?,
                    "title" => draft.title = value.clone(),
                    "publication_year" => draft.publication_year = value.clone(),
                    _ => unreachable!("parse_list_field only yields known fields"),
                }
            }
        }
    }

    for key in order {
        let draft = drafts.remove(&key).expect("key recorded with draft");
        // Cannot collide: keys were deduplicated through the map.
        form.books.push_keyed(ItemKey(key), draft);
    }

    Ok(form)
}

fn parse_id(field: &str, value: &str) -> Result<EntityId> {
    if value.trim().is_empty() {
        return Ok(NEW_ID);
    }
    value
        .trim()
        .parse::<EntityId>()
        .map_err(|_| {
            FormError::InvalidId {
                field: field.to_string(),
                value: value.to_string(),
            }
            .into()
        })
}

/// Split `books[KEY].FIELD` into its key and field, if well-formed.
fn parse_list_field(name: &str) -> Option<(u64, &'static str)> {
    let rest = name.strip_prefix("books[")?;
    let (key_str, field) = rest.split_once("].")?;
    let key = key_str.parse::<u64>().ok()?;
    let field = BOOK_FIELDS.iter().find(|f| **f == field)?;
    Some((key, field))
}
