//! Request extractors that reject with localized error bodies

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    i18n::{Locale, MessageKey},
    models::date_format::INVALID_DATE,
    AppState,
};

/// Locale negotiated from `Accept-Language`
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(RequestLocale(Locale::from_headers(
            &parts.headers,
            state.config.i18n.default_locale,
        )))
    }
}

/// Pick the message for an input that could not be deserialized
fn malformed_input(state: &AppState, locale: Locale, detail: &str) -> ApiError {
    let key = if detail.contains(INVALID_DATE) {
        tracing::error!("Bad request: invalid date format: {}", detail);
        MessageKey::DateFormat
    } else {
        tracing::error!("Bad request: {}", detail);
        MessageKey::BadRequest
    };
    ApiError::bad_request(state.message(key, locale))
}

/// JSON body extractor
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(req.headers(), state.config.i18n.default_locale);
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(malformed_input(state, locale, &rejection.body_text())),
        }
    }
}

/// Query string extractor
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T> FromRequestParts<AppState> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers, state.config.i18n.default_locale);
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(malformed_input(state, locale, &rejection.body_text())),
        }
    }
}

/// Path parameter extractor
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T> FromRequestParts<AppState> for ApiPath<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers, state.config.i18n.default_locale);
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(malformed_input(state, locale, &rejection.body_text())),
        }
    }
}
