//! Book registry service

use crate::{
    error::{AppError, AppResult},
    i18n::MessageKey,
    models::book::{Book, BookFilter, BookRecordIn, BookRecordOut, InsertOutcome},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a single book by id
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookRecordOut> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .map(BookRecordOut::from)
            .ok_or(AppError::NotFound(MessageKey::BookNotFound))
    }

    /// List every book matching the filter
    pub async fn list_by_filter(&self, filter: &BookFilter) -> AppResult<Vec<BookRecordOut>> {
        let books = self.repository.books.find_all(filter).await?;
        Ok(books.into_iter().map(BookRecordOut::from).collect())
    }

    /// Save a new book. Callers check uniqueness first with [`Self::is_unique`].
    pub async fn insert(&self, data: &BookRecordIn) -> AppResult<InsertOutcome> {
        let book = self.repository.books.insert(data).await?;
        tracing::info!("Book {} inserted", book.id);
        Ok(InsertOutcome {
            id: book.id,
            message: MessageKey::BookInserted,
        })
    }

    /// Overwrite all fields of an existing book.
    ///
    /// The book's own title and isbn do not count as collisions, so saving it
    /// with unchanged values succeeds.
    pub async fn update(&self, id: i32, data: &BookRecordIn) -> AppResult<MessageKey> {
        if self.repository.books.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(MessageKey::BookNotFound));
        }

        if !self.is_unique_excluding(&data.title, &data.isbn, Some(id)).await? {
            return Err(AppError::BadRequest(MessageKey::BookNotUnique));
        }

        self.repository
            .books
            .update(id, data)
            .await?
            .ok_or(AppError::NotFound(MessageKey::BookNotFound))?;

        tracing::info!("Book {} updated", id);
        Ok(MessageKey::BookUpdated)
    }

    /// Permanently remove a book
    pub async fn delete(&self, id: i32) -> AppResult<MessageKey> {
        if !self.repository.books.delete_by_id(id).await? {
            return Err(AppError::NotFound(MessageKey::BookNotFound));
        }
        tracing::info!("Book {} deleted", id);
        Ok(MessageKey::BookDeleted)
    }

    /// True when no book has this title and no book has this isbn
    pub async fn is_unique(&self, title: &str, isbn: &str) -> AppResult<bool> {
        self.is_unique_excluding(title, isbn, None).await
    }

    /// Same as [`Self::is_unique`], ignoring the book `except`
    pub async fn is_unique_excluding(
        &self,
        title: &str,
        isbn: &str,
        except: Option<i32>,
    ) -> AppResult<bool> {
        let other = |book: &Option<Book>| {
            book.as_ref().is_some_and(|b| Some(b.id) != except)
        };

        if other(&self.repository.books.find_by_title(title).await?) {
            return Ok(false);
        }
        Ok(!other(&self.repository.books.find_by_isbn(isbn).await?))
    }

    /// Check storage is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }
}
