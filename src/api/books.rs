//! Book endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::ValidationErrors;

use crate::{
    error::{ApiError, ApiResult, AppError},
    i18n::{Locale, MessageKey},
    models::book::{BookPayload, BookQuery, BookRecordIn, BookRecordOut, InsertResponse},
    AppState,
};

use super::extract::{ApiJson, ApiPath, ApiQuery, RequestLocale};

/// Message keys carried by field validation failures, in field order
fn validation_keys(errors: &ValidationErrors) -> Vec<MessageKey> {
    let mut keys: Vec<MessageKey> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_deref())
        .filter_map(|message| message.parse().ok())
        .collect();
    keys.sort_by_key(|key| MessageKey::ALL.iter().position(|k| k == key));
    keys.dedup();
    keys
}

/// Localize a service failure; `id` is interpolated into not-found messages
fn localize(state: &AppState, locale: Locale, error: AppError, id: Option<i32>) -> ApiError {
    let status = error.status();
    let message = match error {
        AppError::NotFound(key) => {
            let args: Vec<String> = id.map(|id| id.to_string()).into_iter().collect();
            state.messages.resolve(key, locale, &args)
        }
        AppError::BadRequest(key) => state.message(key, locale),
        AppError::Validation(errors) => {
            let keys = validation_keys(&errors);
            if keys.is_empty() {
                state.message(MessageKey::BadRequest, locale)
            } else {
                keys.into_iter()
                    .map(|key| state.message(key, locale))
                    .collect::<Vec<_>>()
                    .join("; ")
            }
        }
        AppError::Database(e) => {
            tracing::error!("Database error: {:?}", e);
            state.message(MessageKey::Internal, locale)
        }
    };
    ApiError::new(status, message)
}

fn validate(state: &AppState, locale: Locale, payload: BookPayload) -> ApiResult<BookRecordIn> {
    payload.validated().map_err(|errors| {
        tracing::warn!("Bad request: book payload failed validation: {}", errors);
        localize(state, locale, AppError::Validation(errors), None)
    })
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookRecordOut),
        (status = 404, description = "Book was not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<BookRecordOut>> {
    let book = state.services.books.get_by_id(id).await.map_err(|e| {
        tracing::error!("Error retrieving book with id {}", id);
        localize(&state, locale, e, Some(id))
    })?;
    Ok(Json(book))
}

/// List books matching optional filters
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookRecordOut>),
        (status = 400, description = "Invalid filters", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> ApiResult<Json<Vec<BookRecordOut>>> {
    let filter = query.into_filter().map_err(|e| {
        tracing::error!("Bad request: only one date range parameter was informed");
        localize(&state, locale, e, None)
    })?;

    let books = state
        .services
        .books
        .list_by_filter(&filter)
        .await
        .map_err(|e| localize(&state, locale, e, None))?;
    Ok(Json(books))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = InsertResponse),
        (status = 400, description = "Invalid or duplicated book", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    ApiJson(payload): ApiJson<BookPayload>,
) -> ApiResult<(StatusCode, Json<InsertResponse>)> {
    let record = validate(&state, locale, payload)?;
    let books = &state.services.books;

    let unique = books
        .is_unique(&record.title, &record.isbn)
        .await
        .map_err(|e| localize(&state, locale, e, None))?;
    if !unique {
        tracing::warn!("Rejected duplicate book '{}' ({})", record.title, record.isbn);
        return Err(ApiError::bad_request(
            state.message(MessageKey::BookNotUnique, locale),
        ));
    }

    let outcome = books
        .insert(&record)
        .await
        .map_err(|e| localize(&state, locale, e, None))?;

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            id: outcome.id,
            message: state.message(outcome.message, locale),
        }),
    ))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = String),
        (status = 400, description = "Invalid or duplicated book", body = crate::error::ErrorResponse),
        (status = 404, description = "Book was not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> ApiResult<String> {
    let record = validate(&state, locale, payload)?;

    let key = state
        .services
        .books
        .update(id, &record)
        .await
        .map_err(|e| {
            tracing::error!("Error updating book with id {}: {}", id, e);
            localize(&state, locale, e, Some(id))
        })?;
    Ok(state.message(key, locale))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = String),
        (status = 404, description = "Book was not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<String> {
    let key = state.services.books.delete(id).await.map_err(|e| {
        tracing::error!("Error deleting book with id {}", id);
        localize(&state, locale, e, Some(id))
    })?;
    Ok(state.message(key, locale))
}
