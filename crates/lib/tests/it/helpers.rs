use bookbinder::model::Author;
use bookbinder::store::{AuthorStore, ChangeSet, InMemory};

/// Build an in-memory store holding one committed author.
pub async fn store_with(author: Author) -> (InMemory, Author) {
    let store = InMemory::new();
    let mut changes = ChangeSet::new();
    changes.add(author);
    store.commit(changes).await.expect("commit author");
    let committed = store
        .fetch_all()
        .await
        .expect("fetch authors")
        .into_iter()
        .next()
        .expect("one author committed");
    (store, committed)
}

/// Urlencoded pairs as the server would receive them from a form post.
pub fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect()
}
