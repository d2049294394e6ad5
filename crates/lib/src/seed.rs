//! Opt-in demo data.
//!
//! Seeding is an explicit routine invoked once at process start (the
//! server's `--seed` flag), never a side effect of constructing a store
//! or a request handler.

use crate::Result;
use crate::model::{Author, Book};
use crate::store::{AuthorStore, ChangeSet};

/// Insert the demo authors if the store is empty.
///
/// Returns whether anything was seeded. A store that already holds
/// authors is left untouched, so the flag is safe to keep enabled.
pub async fn seed_demo_data(store: &dyn AuthorStore) -> Result<bool> {
    if !store.fetch_all().await?.is_empty() {
        tracing::debug!("Store already has authors, skipping demo seed");
        return Ok(false);
    }

    let mut changes = ChangeSet::new();
    for author in demo_authors() {
        changes.add(author);
    }
    store.commit(changes).await?;
    tracing::info!("Seeded demo data: 3 authors");
    Ok(true)
}

fn demo_authors() -> Vec<Author> {
    let mut sun_tzu = Author::new("Sun", "Tzu");
    sun_tzu.books.push(Book::new("The Art Of War", "500 b.c."));

    let mut jung = Author::new("Carl", "Jung");
    jung.books.push(Book::new("The Red Book", "2009"));
    jung.books.push(Book::new("Man and His Symbols", "1964"));

    let mut de_souza = Author::new("César", "De Souza");
    de_souza.books.push(Book::new(
        "Action Recognition in Videos: Data-efficient approaches for supervised learning \
         of human action classification models for video",
        "2018",
    ));
    de_souza.books.push(Book::new(
        "Reconhecimento de Gestos da Língua Brasileira de Sinais através de Máquinas de \
         Vetores de Suporte e Campos Condicionais Aleatórios Ocultos",
        "2013",
    ));

    vec![sun_tzu, jung, de_souza]
}
