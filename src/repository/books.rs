//! Books repository backed by PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    i18n::MessageKey,
    models::book::{Book, BookFilter, BookRecordIn},
};

const COLUMNS: &str = "id, title, isbn, published_date";

/// Wrap a user-supplied fragment into an `ILIKE` contains pattern
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Unique index violations surface as the same failure as the application-level check
fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::warn!("Unique constraint rejected book write: {}", db.message());
            AppError::BadRequest(MessageKey::BookNotUnique)
        }
        _ => AppError::Database(e),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_all(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books WHERE TRUE", COLUMNS));

        if let Some(ref title) = filter.title {
            builder.push(" AND title ILIKE ").push_bind(contains_pattern(title));
        }

        if let Some(ref isbn) = filter.isbn {
            builder.push(" AND isbn ILIKE ").push_bind(contains_pattern(isbn));
        }

        if let Some(range) = filter.date_range {
            builder
                .push(" AND published_date BETWEEN ")
                .push_bind(range.from)
                .push(" AND ")
                .push_bind(range.to);
        }

        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE title = $1 LIMIT 1",
            COLUMNS
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE isbn = $1 LIMIT 1",
            COLUMNS
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn insert(&self, data: &BookRecordIn) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, isbn, published_date)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.published_date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update(&self, id: i32, data: &BookRecordIn) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, isbn = $2, published_date = $3
            WHERE id = $4
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.isbn)
        .bind(data.published_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
