//! Tests for the reconciler

use super::*;

use crate::dynlist::ItemKey;
use crate::form::BookForm;
use crate::model::Book;

fn book(id: EntityId, title: &str, year: &str) -> Book {
    Book {
        id,
        title: title.to_string(),
        publication_year: year.to_string(),
    }
}

fn draft(id: EntityId, title: &str, year: &str) -> BookForm {
    BookForm {
        id,
        title: title.to_string(),
        publication_year: year.to_string(),
    }
}

fn submission(drafts: Vec<BookForm>) -> DynamicList<BookForm> {
    let mut list = DynamicList::new();
    for (i, d) in drafts.into_iter().enumerate() {
        assert!(list.push_keyed(ItemKey(i as u64), d));
    }
    list
}

fn jung_books() -> Vec<Book> {
    vec![
        book(5, "The Red Book", "2009"),
        book(6, "Man and His Symbols", "1964"),
    ]
}

#[test]
fn test_identical_submission_is_noop() {
    let mut books = jung_books();
    let original = books.clone();
    let list = DynamicList::from_persisted(&books, BookForm::from_book);

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert!(report.is_noop(), "expected a no-op, got {report:?}");
    assert_eq!(books, original);
}

#[test]
fn test_new_entry_among_unchanged_entries_is_added() {
    let mut books = jung_books();
    let mut list = DynamicList::from_persisted(&books, BookForm::from_book);
    list.append_blank(|| draft(0, "Psychology and Alchemy", "1944"));

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.removed, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(books.len(), 3);

    let new_book = &books[2];
    assert!(new_book.is_new(), "identity is assigned at commit, not here");
    assert_eq!(new_book.title, "Psychology and Alchemy");
}

#[test]
fn test_omitted_identity_is_removed_others_unchanged() {
    let mut books = jung_books();
    let list = submission(vec![draft(6, "Man and His Symbols", "1964")]);

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(books, vec![book(6, "Man and His Symbols", "1964")]);
}

#[test]
fn test_matching_identity_has_fields_updated_in_place() {
    let mut books = jung_books();
    let list = submission(vec![
        draft(5, "The Red Book: Liber Novus", "2009"),
        draft(6, "Man and His Symbols", "1964"),
    ]);

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.added, 0);
    assert_eq!(report.removed, 0);
    // Identity stable: no delete+recreate.
    assert_eq!(books[0], book(5, "The Red Book: Liber Novus", "2009"));
}

#[test]
fn test_empty_submission_removes_all_children() {
    let mut books = jung_books();
    let list: DynamicList<BookForm> = DynamicList::new();

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert_eq!(report.removed, 2);
    assert!(books.is_empty());
}

#[test]
fn test_duplicate_submitted_identity_fails_without_mutation() {
    let mut books = jung_books();
    let original = books.clone();
    let list = submission(vec![
        draft(6, "Man and His Symbols", "1964"),
        draft(6, "Man and His Symbols, 2nd printing", "1968"),
    ]);

    let err = reconcile::<Book>(&mut books, &list).unwrap_err();
    assert!(err.is_conflict(), "expected a conflict, got: {err:?}");
    assert_eq!(books, original, "conflict must leave the collection unmutated");
}

#[test]
fn test_duplicate_persisted_identity_fails_without_mutation() {
    // Two persisted children sharing an id is a data-integrity fault;
    // the reconciler must fail loudly rather than silently pick one.
    let mut books = vec![
        book(6, "Man and His Symbols", "1964"),
        book(6, "Man and His Symbols", "1964"),
    ];
    let original = books.clone();
    let list = submission(vec![draft(6, "Renamed", "1964")]);

    let err = reconcile::<Book>(&mut books, &list).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(books, original);
}

#[test]
fn test_two_sentinel_entries_both_added() {
    // The sentinel may repeat: new entries are distinguished by their
    // positional keys, not by identity.
    let mut books: Vec<Book> = Vec::new();
    let list = submission(vec![draft(0, "First", "2020"), draft(0, "Second", "2021")]);

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, "First");
    assert_eq!(books[1].title, "Second");
}

#[test]
fn test_stale_identity_is_dropped_silently() {
    // Last-writer-wins: an id deleted by a concurrent edit is not
    // resurrected and not an error.
    let mut books = vec![book(6, "Man and His Symbols", "1964")];
    let list = submission(vec![
        draft(6, "Man and His Symbols", "1964"),
        draft(99, "Already deleted elsewhere", "1900"),
    ]);

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert!(report.is_noop());
    assert_eq!(books.len(), 1);
}

#[test]
fn test_carl_jung_scenario() {
    // Persisted: ["The Red Book" (5), "Man and His Symbols" (6)].
    // Submission keeps 6 and adds one new book; 5 must go.
    let mut books = jung_books();
    let list = submission(vec![
        draft(6, "Man and His Symbols", "1964"),
        draft(0, "Psychology and Alchemy", "1944"),
    ]);

    let report = reconcile::<Book>(&mut books, &list).unwrap();
    assert_eq!(report.removed, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.updated, 0);

    assert_eq!(books.len(), 2);
    assert_eq!(books[0], book(6, "Man and His Symbols", "1964"));
    assert!(books[1].is_new());
    assert_eq!(books[1].title, "Psychology and Alchemy");
    assert_eq!(books[1].publication_year, "1944");
}
