//! Dynamic-item provider: server-side initialization for "add one more
//! blank child" requests.
//!
//! The client asks for one freshly initialized editable child, addressed
//! with enough metadata to splice the rendered fragment into the correct
//! place in its in-progress (unsaved) parent form. The address is derived
//! entirely from the form's current field-naming scheme; no server state
//! is consulted, so the endpoint is stateless across requests.

use serde::Deserialize;

use crate::dynlist::ItemKey;

/// Where in the client's current list structure the new item goes.
///
/// `container_id` is the DOM id of the list container, `list_path` the
/// field-name path of the list within the parent form (`books`), and
/// `key` the positional key the client chose for the new entry. The
/// client seeds its key counter above every server-rendered key, so the
/// key cannot collide with an entry already in the form.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertionAddress {
    pub container_id: String,
    pub list_path: String,
    pub key: u64,
}

impl InsertionAddress {
    /// Positional key of the entry being created.
    pub fn item_key(&self) -> ItemKey {
        ItemKey(self.key)
    }

    /// Field-name prefix the fragment's inputs must carry so the
    /// fragment submits correctly as part of the parent form.
    pub fn field_prefix(&self) -> String {
        format!("{}[{}]", self.list_path, self.key)
    }
}

/// One freshly initialized editable child, ready to render.
#[derive(Debug, Clone)]
pub struct BlankItem<T> {
    pub key: ItemKey,
    pub field_prefix: String,
    pub item: T,
}

/// Build a blank item for the given address.
pub fn blank_item<T>(address: &InsertionAddress, factory: impl FnOnce() -> T) -> BlankItem<T> {
    BlankItem {
        key: address.item_key(),
        field_prefix: address.field_prefix(),
        item: factory(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::form::BookForm;
    use crate::model::NEW_ID;

    fn address(key: u64) -> InsertionAddress {
        InsertionAddress {
            container_id: "books-list".to_string(),
            list_path: "books".to_string(),
            key,
        }
    }

    #[test]
    fn test_field_prefix_follows_naming_scheme() {
        assert_eq!(address(17).field_prefix(), "books[17]");
    }

    #[test]
    fn test_blank_item_carries_sentinel_identity() {
        let item = blank_item(&address(3), BookForm::blank);
        assert_eq!(item.key, ItemKey(3));
        assert_eq!(item.field_prefix, "books[3]");
        assert_eq!(item.item.id, NEW_ID);
        assert!(item.item.title.is_empty());
    }

    #[test]
    fn test_distinct_addresses_yield_distinct_keys() {
        let a = blank_item(&address(1), BookForm::blank);
        let b = blank_item(&address(2), BookForm::blank);
        assert_ne!(a.key, b.key);
    }
}
