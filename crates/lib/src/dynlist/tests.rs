//! Tests for the DynamicList editable-list projection

use super::*;

use crate::form::BookForm;
use crate::model::Book;

fn sample_books() -> Vec<Book> {
    vec![
        Book {
            id: 5,
            title: "The Red Book".to_string(),
            publication_year: "2009".to_string(),
        },
        Book {
            id: 6,
            title: "Man and His Symbols".to_string(),
            publication_year: "1964".to_string(),
        },
    ]
}

#[test]
fn test_from_persisted_assigns_sequential_keys_in_order() {
    let books = sample_books();
    let list = DynamicList::from_persisted(&books, BookForm::from_book);

    let keys: Vec<ItemKey> = list.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![ItemKey(0), ItemKey(1)]);

    let titles: Vec<&str> = list.iter().map(|(_, b)| b.title.as_str()).collect();
    assert_eq!(titles, vec!["The Red Book", "Man and His Symbols"]);
}

#[test]
fn test_round_trip_preserves_identities_fields_and_order() {
    // from_persisted followed by to_persisted must reproduce the
    // children exactly, in the same order.
    let books = sample_books();
    let list = DynamicList::from_persisted(&books, BookForm::from_book);
    let round_tripped = list.to_persisted(BookForm::to_book);

    assert_eq!(round_tripped, books);
}

#[test]
fn test_append_blank_twice_yields_distinct_keys() {
    // Two simultaneously-added blank items both carry the sentinel id,
    // so only the positional keys distinguish them.
    let mut list: DynamicList<BookForm> = DynamicList::new();
    let first = list.append_blank(BookForm::blank);
    let second = list.append_blank(BookForm::blank);

    assert_ne!(first, second);
    assert_eq!(list.get(first).unwrap().id, crate::NEW_ID);
    assert_eq!(list.get(second).unwrap().id, crate::NEW_ID);
}

#[test]
fn test_append_blank_never_collides_with_persisted_keys() {
    let books = sample_books();
    let mut list = DynamicList::from_persisted(&books, BookForm::from_book);
    let key = list.append_blank(BookForm::blank);

    assert_eq!(key, ItemKey(2));
    assert_eq!(list.len(), 3);
}

#[test]
fn test_push_keyed_rejects_duplicate_key() {
    let mut list: DynamicList<BookForm> = DynamicList::new();
    assert!(list.push_keyed(ItemKey(7), BookForm::blank()));
    assert!(!list.push_keyed(ItemKey(7), BookForm::blank()));
    assert_eq!(list.len(), 1);
}

#[test]
fn test_push_keyed_advances_counter_past_client_keys() {
    // Keys submitted by the client may be sparse; the counter must stay
    // above all of them so a later append_blank cannot collide.
    let mut list: DynamicList<BookForm> = DynamicList::new();
    assert!(list.push_keyed(ItemKey(12), BookForm::blank()));
    assert!(list.push_keyed(ItemKey(3), BookForm::blank()));

    let key = list.append_blank(BookForm::blank);
    assert_eq!(key, ItemKey(13));
}

#[test]
fn test_empty_list_round_trip() {
    let list: DynamicList<BookForm> = DynamicList::from_persisted(&[], BookForm::from_book);
    assert!(list.is_empty());
    assert!(list.to_persisted(BookForm::to_book).is_empty());
    assert_eq!(list.next_key(), ItemKey(0));
}
