//! Book Registry
//!
//! A REST JSON API for managing book records: lookup, filtered listing,
//! creation, update and removal, with messages localized per request.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{ApiError, AppError, AppResult};

use i18n::{Locale, Localizer, MessageCatalog, MessageKey};
use repository::Repository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub messages: Arc<dyn Localizer>,
}

impl AppState {
    /// Build the state with the compiled message catalog
    pub fn new(config: AppConfig, repository: Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            messages: Arc::new(MessageCatalog),
        }
    }

    /// Shorthand for resolving a message without arguments
    pub fn message(&self, key: MessageKey, locale: Locale) -> String {
        self.messages.resolve(key, locale, &[])
    }
}
