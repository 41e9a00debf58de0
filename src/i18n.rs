//! Localized messages
//!
//! Every user-facing text is identified by a [`MessageKey`]. Services only ever
//! return keys; the API layer resolves them for the locale negotiated from the
//! request's `Accept-Language` header.

use std::fmt;
use std::str::FromStr;

use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};
use serde::Deserialize;

/// Identifier of a localized message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    BookNotFound,
    BookNotUnique,
    BookInserted,
    BookUpdated,
    BookDeleted,
    TitleRequired,
    IsbnRequired,
    PublishedDateRequired,
    DateRangeIncomplete,
    DateFormat,
    BadRequest,
    Internal,
}

impl MessageKey {
    pub const ALL: [MessageKey; 12] = [
        MessageKey::BookNotFound,
        MessageKey::BookNotUnique,
        MessageKey::BookInserted,
        MessageKey::BookUpdated,
        MessageKey::BookDeleted,
        MessageKey::TitleRequired,
        MessageKey::IsbnRequired,
        MessageKey::PublishedDateRequired,
        MessageKey::DateRangeIncomplete,
        MessageKey::DateFormat,
        MessageKey::BadRequest,
        MessageKey::Internal,
    ];

    /// Catalog identifier of this message
    pub fn as_key(&self) -> &'static str {
        match self {
            MessageKey::BookNotFound => "error.book.notFound",
            MessageKey::BookNotUnique => "error.book.notUnique",
            MessageKey::BookInserted => "success.book.insert",
            MessageKey::BookUpdated => "success.book.update",
            MessageKey::BookDeleted => "success.book.delete",
            MessageKey::TitleRequired => "error.book.title.notNull",
            MessageKey::IsbnRequired => "error.book.isbn.notNull",
            MessageKey::PublishedDateRequired => "error.book.publishedDate.notNull",
            MessageKey::DateRangeIncomplete => "error.book.dateRange.incomplete",
            MessageKey::DateFormat => "error.date.format",
            MessageKey::BadRequest => "error.badRequest",
            MessageKey::Internal => "error.internal",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown message key: {0}")]
pub struct UnknownMessageKey(pub String);

impl FromStr for MessageKey {
    type Err = UnknownMessageKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKey::ALL
            .into_iter()
            .find(|key| key.as_key() == s)
            .ok_or_else(|| UnknownMessageKey(s.to_string()))
    }
}

/// Supported locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Locale {
    #[default]
    En,
    PtBr,
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        Locale::from_tag(&tag).ok_or_else(|| format!("unsupported locale: {}", tag))
    }
}

impl Locale {
    /// Match a BCP 47 language tag against the supported locales.
    ///
    /// Only the primary subtag is significant: `en-GB` resolves to English and
    /// `pt-PT` to Brazilian Portuguese.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::En),
            "pt" => Some(Locale::PtBr),
            _ => None,
        }
    }

    /// Pick the preferred supported locale from an `Accept-Language` header value
    pub fn negotiate(accept_language: &str) -> Option<Self> {
        let mut ranges: Vec<(f32, usize, &str)> = accept_language
            .split(',')
            .enumerate()
            .filter_map(|(position, range)| {
                let mut parts = range.split(';');
                let tag = parts.next()?.trim();
                let quality = parts
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0 && !tag.is_empty()).then_some((quality, position, tag))
            })
            .collect();

        // Highest quality first, header order breaks ties
        ranges.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        ranges.into_iter().find_map(|(_, _, tag)| Locale::from_tag(tag))
    }

    /// Resolve the locale of a request, falling back to `default`
    pub fn from_headers(headers: &HeaderMap, default: Locale) -> Self {
        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(Locale::negotiate)
            .unwrap_or(default)
    }
}

/// Resolves message keys to display text
pub trait Localizer: Send + Sync {
    fn resolve(&self, key: MessageKey, locale: Locale, args: &[String]) -> String;
}

/// Compiled message catalog for every supported locale
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCatalog;

impl MessageCatalog {
    fn template(key: MessageKey, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match key {
                MessageKey::BookNotFound => "Book with id {0} was not found",
                MessageKey::BookNotUnique => "A book with this title or ISBN already exists",
                MessageKey::BookInserted => "Book successfully created",
                MessageKey::BookUpdated => "Book successfully updated",
                MessageKey::BookDeleted => "Book successfully deleted",
                MessageKey::TitleRequired => "Title is required",
                MessageKey::IsbnRequired => "ISBN is required",
                MessageKey::PublishedDateRequired => "Published date is required",
                MessageKey::DateRangeIncomplete => {
                    "If filtering by date, both before and after dates must be informed"
                }
                MessageKey::DateFormat => "Dates must be informed in 'yyyy-MM-dd' format",
                MessageKey::BadRequest => "Bad request",
                MessageKey::Internal => "Internal server error",
            },
            Locale::PtBr => match key {
                MessageKey::BookNotFound => "Livro com id {0} não foi encontrado",
                MessageKey::BookNotUnique => "Já existe um livro com este título ou ISBN",
                MessageKey::BookInserted => "Livro cadastrado com sucesso",
                MessageKey::BookUpdated => "Livro atualizado com sucesso",
                MessageKey::BookDeleted => "Livro removido com sucesso",
                MessageKey::TitleRequired => "O título é obrigatório",
                MessageKey::IsbnRequired => "O ISBN é obrigatório",
                MessageKey::PublishedDateRequired => "A data de publicação é obrigatória",
                MessageKey::DateRangeIncomplete => {
                    "Ao filtrar por data, as datas inicial e final devem ser informadas"
                }
                MessageKey::DateFormat => "As datas devem ser informadas no formato 'yyyy-MM-dd'",
                MessageKey::BadRequest => "Requisição inválida",
                MessageKey::Internal => "Erro interno do servidor",
            },
        }
    }
}

impl Localizer for MessageCatalog {
    fn resolve(&self, key: MessageKey, locale: Locale, args: &[String]) -> String {
        args.iter()
            .enumerate()
            .fold(Self::template(key, locale).to_string(), |text, (i, arg)| {
                text.replace(&format!("{{{}}}", i), arg)
            })
    }
}
