//! Editable-list projection for dynamic child collections.
//!
//! A [`DynamicList`] pairs each editable child item with a positional key
//! that is unique within the list for one request/response round trip.
//! Entity identities cannot serve this purpose: several freshly added
//! items all carry the "new" sentinel id, yet the reconciler (and the
//! form field naming) must still tell them apart.
//!
//! The projection holds no reference to the persistence layer and is
//! discarded after the response is sent.

#[cfg(test)]
mod tests;

use std::fmt;

/// Positional key of one entry in a [`DynamicList`].
///
/// Keys are distinct from entity identities: they are assigned from a
/// per-list monotonic counter and never reused within one render, and
/// they appear verbatim in form field names (`books[3].title`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey(pub u64);

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An ordered sequence of (positional key, editable item) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicList<T> {
    entries: Vec<(ItemKey, T)>,
    next_key: u64,
}

impl<T> DynamicList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 0,
        }
    }

    /// Build one positional entry per existing child, in the children's
    /// current order. Keys are assigned sequentially from zero and are
    /// stable for the duration of one round trip.
    pub fn from_persisted<E>(children: &[E], mut project: impl FnMut(&E) -> T) -> Self {
        let entries = children
            .iter()
            .enumerate()
            .map(|(i, child)| (ItemKey(i as u64), project(child)))
            .collect::<Vec<_>>();
        Self {
            next_key: entries.len() as u64,
            entries,
        }
    }

    /// Append one freshly initialized item, returning a key guaranteed
    /// distinct from every key currently in the list.
    pub fn append_blank(&mut self, factory: impl FnOnce() -> T) -> ItemKey {
        let key = ItemKey(self.next_key);
        self.next_key += 1;
        self.entries.push((key, factory()));
        key
    }

    /// Append an item under a caller-supplied key (used when rebinding a
    /// submitted form, where keys come from the client's field names).
    ///
    /// Returns `false` and leaves the list untouched if the key is
    /// already present.
    pub fn push_keyed(&mut self, key: ItemKey, item: T) -> bool {
        if self.contains_key(key) {
            return false;
        }
        self.next_key = self.next_key.max(key.0 + 1);
        self.entries.push((key, item));
        true
    }

    /// Materialize the current entries back into entities, preserving
    /// list order.
    pub fn to_persisted<E>(&self, mut project: impl FnMut(&T) -> E) -> Vec<E> {
        self.entries.iter().map(|(_, item)| project(item)).collect()
    }

    /// The key [`append_blank`](Self::append_blank) would assign next.
    ///
    /// Exposed so the rendered form can seed its client-side counter
    /// above every server-assigned key.
    pub fn next_key(&self) -> ItemKey {
        ItemKey(self.next_key)
    }

    pub fn contains_key(&self, key: ItemKey) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn get(&self, key: ItemKey) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, item)| item)
    }

    pub fn get_mut(&mut self, key: ItemKey) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, item)| item)
    }

    /// Iterate entries in list order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &T)> {
        self.entries.iter().map(|(k, item)| (*k, item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for DynamicList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a DynamicList<T> {
    type Item = (ItemKey, &'a T);
    type IntoIter = std::vec::IntoIter<(ItemKey, &'a T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(|(k, item)| (*k, item))
            .collect::<Vec<_>>()
            .into_iter()
    }
}
