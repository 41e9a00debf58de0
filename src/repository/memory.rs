//! In-process books store, used when no database is configured and in tests

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    i18n::MessageKey,
    models::book::{Book, BookFilter, BookRecordIn},
};

#[derive(Default)]
struct Books {
    last_id: i32,
    rows: BTreeMap<i32, Book>,
}

impl Books {
    /// Mirrors the unique indexes on `books.title` and `books.isbn`
    fn check_unique(&self, data: &BookRecordIn, except: Option<i32>) -> AppResult<()> {
        let taken = self.rows.values().any(|book| {
            Some(book.id) != except && (book.title == data.title || book.isbn == data.isbn)
        });
        if taken {
            return Err(AppError::BadRequest(MessageKey::BookNotUnique));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBooksRepository {
    books: RwLock<Books>,
}

impl MemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBooksRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .rows
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.rows.values().find(|b| b.title == title).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let books = self.books.read().await;
        Ok(books.rows.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn insert(&self, data: &BookRecordIn) -> AppResult<Book> {
        let mut books = self.books.write().await;
        books.check_unique(data, None)?;

        books.last_id += 1;
        let book = Book {
            id: books.last_id,
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            published_date: data.published_date,
        };
        books.rows.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, data: &BookRecordIn) -> AppResult<Option<Book>> {
        let mut books = self.books.write().await;
        if !books.rows.contains_key(&id) {
            return Ok(None);
        }
        books.check_unique(data, Some(id))?;

        let book = Book {
            id,
            title: data.title.clone(),
            isbn: data.isbn.clone(),
            published_date: data.published_date,
        };
        books.rows.insert(id, book.clone());
        Ok(Some(book))
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        Ok(self.books.write().await.rows.remove(&id).is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
