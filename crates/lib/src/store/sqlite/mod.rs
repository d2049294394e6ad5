//! SQLite author store backed by sqlx.
//!
//! A request's change set is applied inside a single transaction at
//! commit time; the transaction is the atomicity boundary, so a failing
//! operation rolls back everything queued with it.

/// Schema definition and version tracking.
pub mod schema;

use std::any::Any;
use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

type Tx<'a> = sqlx::Transaction<'a, sqlx::Sqlite>;

use crate::Result;
use crate::model::{Author, Book, EntityId};
use crate::store::{AuthorStore, ChangeSet, PendingOp, StoreError};

/// Extension trait for sqlx Result types to simplify error handling.
///
/// Similar to `anyhow::Context`, this adds a method to convert sqlx
/// errors to `StoreError::Sqlx` with a context message.
pub(crate) trait SqlxResultExt<T> {
    /// Convert sqlx error to StoreError with context message.
    fn sql_context(self, context: &str) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn sql_context(self, context: &str) -> Result<T> {
        self.map_err(|e| {
            StoreError::Sqlx {
                reason: format!("{context}: {e}"),
                source: Some(e),
            }
            .into()
        })
    }
}

/// SQLite-backed author store.
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    /// Open (creating if missing) a database file.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .sql_context("opening sqlite database")?;
        Self::from_pool(pool).await
    }

    /// Open an in-memory database, mainly for tests.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);
        // One connection only: each sqlite :memory: connection is its
        // own database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .sql_context("opening in-memory sqlite database")?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        schema::init_schema(&pool).await?;
        Ok(Self { pool })
    }
}

fn author_from_row(row: &sqlx::sqlite::SqliteRow) -> Author {
    Author {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        books: Vec::new(),
    }
}

fn book_from_row(row: &sqlx::sqlite::SqliteRow) -> Book {
    Book {
        id: row.get("id"),
        title: row.get("title"),
        publication_year: row.get("publication_year"),
    }
}

async fn insert_book(tx: &mut Tx<'_>, author_id: EntityId, book: &Book) -> Result<()> {
    sqlx::query("INSERT INTO books (author_id, title, publication_year) VALUES (?1, ?2, ?3)")
        .bind(author_id)
        .bind(&book.title)
        .bind(&book.publication_year)
        .execute(&mut **tx)
        .await
        .sql_context("inserting book")?;
    Ok(())
}

async fn apply(tx: &mut Tx<'_>, op: PendingOp) -> Result<()> {
    match op {
        PendingOp::Insert(author) => {
            let result = sqlx::query("INSERT INTO authors (first_name, last_name) VALUES (?1, ?2)")
                .bind(&author.first_name)
                .bind(&author.last_name)
                .execute(&mut **tx)
                .await
                .sql_context("inserting author")?;
            let author_id = result.last_insert_rowid();
            for book in &author.books {
                insert_book(tx, author_id, book).await?;
            }
        }
        PendingOp::Update(author) => {
            let result = sqlx::query("UPDATE authors SET first_name = ?1, last_name = ?2 WHERE id = ?3")
                .bind(&author.first_name)
                .bind(&author.last_name)
                .bind(author.id)
                .execute(&mut **tx)
                .await
                .sql_context("updating author")?;
            if result.rows_affected() == 0 {
                return Err(StoreError::AuthorNotFound { id: author.id }.into());
            }

            // The aggregate is already reconciled: rows must end up
            // matching its book collection exactly.
            let existing: Vec<EntityId> =
                sqlx::query_scalar("SELECT id FROM books WHERE author_id = ?1")
                    .bind(author.id)
                    .fetch_all(&mut **tx)
                    .await
                    .sql_context("listing author's books")?;
            let kept: Vec<EntityId> = author
                .books
                .iter()
                .filter(|b| !b.is_new())
                .map(|b| b.id)
                .collect();
            for stale in existing.iter().filter(|id| !kept.contains(id)) {
                sqlx::query("DELETE FROM books WHERE id = ?1")
                    .bind(stale)
                    .execute(&mut **tx)
                    .await
                    .sql_context("deleting removed book")?;
            }
            for book in &author.books {
                if book.is_new() {
                    insert_book(tx, author.id, book).await?;
                } else {
                    sqlx::query(
                        "UPDATE books SET title = ?1, publication_year = ?2 \
                         WHERE id = ?3 AND author_id = ?4",
                    )
                    .bind(&book.title)
                    .bind(&book.publication_year)
                    .bind(book.id)
                    .bind(author.id)
                    .execute(&mut **tx)
                    .await
                    .sql_context("updating book")?;
                }
            }
        }
        PendingOp::Remove(id) => {
            sqlx::query("DELETE FROM books WHERE author_id = ?1")
                .bind(id)
                .execute(&mut **tx)
                .await
                .sql_context("deleting author's books")?;
            sqlx::query("DELETE FROM authors WHERE id = ?1")
                .bind(id)
                .execute(&mut **tx)
                .await
                .sql_context("deleting author")?;
        }
    }
    Ok(())
}

#[async_trait]
impl AuthorStore for Sqlite {
    async fn fetch_all(&self) -> Result<Vec<Author>> {
        let author_rows =
            sqlx::query("SELECT id, first_name, last_name FROM authors ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .sql_context("fetching authors")?;
        let mut authors: Vec<Author> = author_rows.iter().map(author_from_row).collect();

        let book_rows = sqlx::query(
            "SELECT id, author_id, title, publication_year FROM books ORDER BY author_id, id",
        )
        .fetch_all(&self.pool)
        .await
        .sql_context("fetching books")?;
        for row in &book_rows {
            let author_id: EntityId = row.get("author_id");
            if let Some(author) = authors.iter_mut().find(|a| a.id == author_id) {
                author.books.push(book_from_row(row));
            }
        }
        Ok(authors)
    }

    async fn fetch_with_books(&self, id: EntityId) -> Result<Option<Author>> {
        let row = sqlx::query("SELECT id, first_name, last_name FROM authors WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .sql_context("fetching author")?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut author = author_from_row(&row);

        let book_rows = sqlx::query(
            "SELECT id, title, publication_year FROM books WHERE author_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .sql_context("fetching author's books")?;
        author.books = book_rows.iter().map(book_from_row).collect();
        Ok(Some(author))
    }

    async fn fetch_book(&self, id: EntityId) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT id, title, publication_year FROM books WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .sql_context("fetching book")?;
        Ok(row.as_ref().map(book_from_row))
    }

    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.sql_context("beginning commit")?;
        for op in changes.ops {
            // An error drops the transaction, rolling back everything.
            apply(&mut tx, op).await?;
        }
        tx.commit().await.sql_context("committing")?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
