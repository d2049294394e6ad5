//! Form binding error types.
//!
//! These cover structurally malformed submissions (bad identities,
//! mangled list field names). Declared-constraint violations are not
//! errors; they are reported by `AuthorForm::validate` so the page can
//! re-render with messages.

use thiserror::Error;

/// Errors that can occur while binding a submitted form body.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FormError {
    /// An identity field held something other than an integer.
    #[error("Field {field} is not a valid identity: {value:?}")]
    InvalidId {
        /// The form field name
        field: String,
        /// The submitted value
        value: String,
    },

    /// A list field name did not follow the `books[key].field` scheme.
    #[error("Malformed list field name: {name:?}")]
    MalformedListField {
        /// The form field name
        name: String,
    },

    /// The same field was submitted twice for one positional key.
    #[error("Duplicate form field: {name:?}")]
    DuplicateField {
        /// The form field name
        name: String,
    },
}

impl From<FormError> for crate::Error {
    fn from(err: FormError) -> Self {
        crate::Error::Form(err)
    }
}
