//! Full edit-flow round trips: fetch, render projection, bind the
//! submitted form, reconcile, commit.

use bookbinder::form::{AuthorForm, BookForm, bind_author_form};
use bookbinder::model::{Author, Book};
use bookbinder::reconcile::reconcile;
use bookbinder::store::{AuthorStore, ChangeSet};

use crate::helpers::{pairs, store_with};

fn jung() -> Author {
    let mut author = Author::new("Carl", "Jung");
    author.books.push(Book::new("The Red Book", "2009"));
    author.books.push(Book::new("Man and His Symbols", "1964"));
    author
}

#[tokio::test]
async fn edit_flow_add_and_remove_books() {
    let (store, committed) = store_with(jung()).await;
    let red_book_id = committed.books[0].id;
    let symbols_id = committed.books[1].id;

    // The rendered edit form projects the persisted books under keys
    // 0 and 1; the client removed the first row and added a new one
    // under the next free key.
    let form_before = AuthorForm::from_author(&committed);
    let next_key = form_before.books.next_key();

    let body = pairs(&[
        ("id", &committed.id.to_string()),
        ("first_name", "Carl"),
        ("last_name", "Jung"),
        ("books[1].id", &symbols_id.to_string()),
        ("books[1].title", "Man and His Symbols"),
        ("books[1].publication_year", "1964"),
        (&format!("books[{next_key}].id"), ""),
        (&format!("books[{next_key}].title"), "Psychology and Alchemy"),
        (&format!("books[{next_key}].publication_year"), "1944"),
    ]);

    let form = bind_author_form(&body).expect("bind submission");
    assert!(form.validate().is_empty());

    let mut author = store
        .fetch_with_books(form.id)
        .await
        .expect("fetch")
        .expect("author exists");
    let report = reconcile::<Book>(&mut author.books, &form.books).expect("reconcile");
    assert_eq!(report.added, 1);
    assert_eq!(report.removed, 1);

    author.first_name = form.first_name.clone();
    author.last_name = form.last_name.clone();
    let mut changes = ChangeSet::new();
    changes.mark_updated(author);
    store.commit(changes).await.expect("commit");

    let after = store
        .fetch_with_books(committed.id)
        .await
        .expect("fetch")
        .expect("author still exists");
    assert_eq!(after.books.len(), 2);
    assert_eq!(after.books[0].id, symbols_id);
    assert!(after.books.iter().all(|b| b.id != red_book_id));
    let new_book = &after.books[1];
    assert_eq!(new_book.title, "Psychology and Alchemy");
    assert_eq!(new_book.publication_year, "1944");
    assert_ne!(new_book.id, 0);
}

#[tokio::test]
async fn edit_flow_identical_submission_commits_nothing_new() {
    let (store, committed) = store_with(jung()).await;

    let form = AuthorForm::from_author(&committed);
    let mut author = committed.clone();
    let report = reconcile::<Book>(&mut author.books, &form.books).expect("reconcile");
    assert!(report.is_noop());

    let mut changes = ChangeSet::new();
    changes.mark_updated(author);
    store.commit(changes).await.expect("commit");

    let after = store
        .fetch_with_books(committed.id)
        .await
        .expect("fetch")
        .expect("author");
    assert_eq!(after, committed);
}

#[tokio::test]
async fn edit_flow_conflict_leaves_store_untouched() {
    let (store, committed) = store_with(jung()).await;
    let symbols_id = committed.books[1].id;

    // Hand-crafted submission referencing the same id twice.
    let body = pairs(&[
        ("id", &committed.id.to_string()),
        ("first_name", "Carl"),
        ("last_name", "Jung"),
        ("books[0].id", &symbols_id.to_string()),
        ("books[0].title", "Man and His Symbols"),
        ("books[0].publication_year", "1964"),
        ("books[1].id", &symbols_id.to_string()),
        ("books[1].title", "Duplicate row"),
        ("books[1].publication_year", "1968"),
    ]);

    let form = bind_author_form(&body).expect("bind");
    let mut author = committed.clone();
    let err = reconcile::<Book>(&mut author.books, &form.books).unwrap_err();
    assert!(err.is_conflict());

    // The handler aborts before building a change set, so nothing is
    // committed.
    let after = store
        .fetch_with_books(committed.id)
        .await
        .expect("fetch")
        .expect("author");
    assert_eq!(after, committed);
}

#[tokio::test]
async fn create_flow_binds_and_persists_new_aggregate() {
    let store = bookbinder::store::InMemory::new();

    let body = pairs(&[
        ("first_name", "Sun"),
        ("last_name", "Tzu"),
        ("books[0].id", ""),
        ("books[0].title", "The Art Of War"),
        ("books[0].publication_year", "500 b.c."),
    ]);
    let form = bind_author_form(&body).expect("bind");
    assert!(form.validate().is_empty());

    let mut changes = ChangeSet::new();
    changes.add(form.to_author());
    store.commit(changes).await.expect("commit");

    let authors = store.fetch_all().await.expect("fetch");
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].full_name(), "Sun Tzu");
    assert_eq!(authors[0].books[0].publication_year, "500 b.c.");
}
