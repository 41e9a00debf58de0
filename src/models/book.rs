//! Book model, request/response shapes and list filters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use super::date_format;
use crate::{
    error::{AppError, AppResult},
    i18n::MessageKey,
};

/// Persisted book record
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub published_date: NaiveDate,
}

/// Book as sent by clients on create and update.
///
/// Every field is optional at the JSON level so a missing field is reported through
/// validation with its own message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[validate(
        required(message = "error.book.title.notNull"),
        custom(function = "not_blank", message = "error.book.title.notNull")
    )]
    #[schema(example = "Dune")]
    pub title: Option<String>,

    #[validate(
        required(message = "error.book.isbn.notNull"),
        custom(function = "not_blank", message = "error.book.isbn.notNull")
    )]
    #[schema(example = "9780441013593")]
    pub isbn: Option<String>,

    /// Publication date, `yyyy-MM-dd`
    #[serde(default, deserialize_with = "date_format::option::deserialize")]
    #[validate(required(message = "error.book.publishedDate.notNull"))]
    #[schema(value_type = String, format = Date, example = "1965-08-01")]
    pub published_date: Option<NaiveDate>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

impl BookPayload {
    /// Run field validation and unwrap the payload into a [`BookRecordIn`]
    pub fn validated(self) -> Result<BookRecordIn, ValidationErrors> {
        self.validate()?;
        let (Some(title), Some(isbn), Some(published_date)) =
            (self.title, self.isbn, self.published_date)
        else {
            return Err(ValidationErrors::new());
        };
        Ok(BookRecordIn {
            title,
            isbn,
            published_date,
        })
    }
}

/// Validated book data used for inserts and updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecordIn {
    pub title: String,
    pub isbn: String,
    pub published_date: NaiveDate,
}

/// Book as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRecordOut {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    #[serde(with = "date_format")]
    #[schema(value_type = String, format = Date, example = "1965-08-01")]
    pub published_date: NaiveDate,
}

impl From<Book> for BookRecordOut {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            published_date: book.published_date,
        }
    }
}

/// Outcome of an insert: the new id and the success message to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    pub id: i32,
    pub message: MessageKey,
}

/// Response body of a successful insert
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsertResponse {
    /// Identifier assigned to the new book
    pub id: i32,
    /// Localized success message
    pub message: String,
}

/// Query parameters accepted when listing books
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Substring of the title (case-insensitive)
    pub title: Option<String>,
    /// Substring of the ISBN (case-insensitive)
    pub isbn: Option<String>,
    /// Start of the publication date range, inclusive. Requires `publishedBefore`.
    #[serde(default, deserialize_with = "date_format::option::deserialize")]
    #[param(value_type = Option<String>, format = Date)]
    pub published_after: Option<NaiveDate>,
    /// End of the publication date range, inclusive. Requires `publishedAfter`.
    #[serde(default, deserialize_with = "date_format::option::deserialize")]
    #[param(value_type = Option<String>, format = Date)]
    pub published_before: Option<NaiveDate>,
}

impl BookQuery {
    /// Assemble the list filter; a date range needs both of its bounds
    pub fn into_filter(self) -> AppResult<BookFilter> {
        let date_range = match (self.published_after, self.published_before) {
            (Some(from), Some(to)) => Some(DateRange { from, to }),
            (None, None) => None,
            _ => return Err(AppError::BadRequest(MessageKey::DateRangeIncomplete)),
        };

        Ok(BookFilter {
            title: non_empty(self.title),
            isbn: non_empty(self.isbn),
            date_range,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Inclusive range of publication dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Conjunction of optional criteria a listed book must satisfy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the ISBN
    pub isbn: Option<String>,
    pub date_range: Option<DateRange>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(&book.title, &self.title)
            && contains(&book.isbn, &self.isbn)
            && self
                .date_range
                .map_or(true, |range| range.contains(book.published_date))
    }
}
