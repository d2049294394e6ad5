//! Tests for the opt-in demo-data seed routine.

use bookbinder::seed::seed_demo_data;
use bookbinder::store::{AuthorStore, ChangeSet, InMemory};

#[tokio::test]
async fn seed_populates_empty_store_once() {
    let store = InMemory::new();

    assert!(seed_demo_data(&store).await.expect("first seed"));
    let authors = store.fetch_all().await.expect("fetch");
    assert_eq!(authors.len(), 3);

    let jung = authors
        .iter()
        .find(|a| a.last_name == "Jung")
        .expect("Jung seeded");
    assert_eq!(jung.books.len(), 2);

    let sun_tzu = authors
        .iter()
        .find(|a| a.last_name == "Tzu")
        .expect("Sun Tzu seeded");
    assert_eq!(sun_tzu.books[0].publication_year, "500 b.c.");

    // Second run is a no-op.
    assert!(!seed_demo_data(&store).await.expect("second seed"));
    assert_eq!(store.fetch_all().await.expect("fetch").len(), 3);
}

#[tokio::test]
async fn seed_skips_non_empty_store() {
    let store = InMemory::new();
    let mut changes = ChangeSet::new();
    changes.add(bookbinder::model::Author::new("Ada", "Lovelace"));
    store.commit(changes).await.expect("commit");

    assert!(!seed_demo_data(&store).await.expect("seed"));
    assert_eq!(store.fetch_all().await.expect("fetch").len(), 1);
}
