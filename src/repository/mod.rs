//! Repository layer for book storage

pub mod books;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, BookFilter, BookRecordIn},
};

/// Storage operations over books.
///
/// Writes that would break title or isbn uniqueness fail with
/// `AppError::BadRequest(MessageKey::BookNotUnique)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    /// All books matching `filter`, ordered by id
    async fn find_all(&self, filter: &BookFilter) -> AppResult<Vec<Book>>;

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    async fn insert(&self, data: &BookRecordIn) -> AppResult<Book>;

    /// Overwrite every field of book `id`; `None` when it does not exist
    async fn update(&self, id: i32, data: &BookRecordIn) -> AppResult<Option<Book>>;

    /// Returns false when no row had that id
    async fn delete_by_id(&self, id: i32) -> AppResult<bool>;

    /// Check the backing store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool)),
        }
    }

    /// Create a repository that keeps everything in process memory
    pub fn in_memory() -> Self {
        Self {
            books: Arc::new(memory::MemoryBooksRepository::new()),
        }
    }
}
