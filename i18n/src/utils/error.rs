use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::locale::ParseError;

/// Errors raised by locale parsing, catalog loading and configuration.
///
/// A missing translation is not an error: lookups degrade to the source text.
#[derive(Error, Debug)]
pub enum I18nError {
    // Locale errors 1xxx
    #[error(transparent)]
    InvalidLocale(#[from] ParseError),

    // Catalog errors 2xxx
    #[error("Failed to load messages for category '{category}' in '{language}': {message}")]
    CatalogLoad { category: String, language: String, message: String },

    #[error("Malformed message file {path}: {message}")]
    CatalogFormat { path: String, message: String },

    // Routing errors 3xxx
    #[error("Unable to locate message source for category '{0}'")]
    UnknownCategory(String),

    // Validation errors 4xxx
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // System errors 5xxx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl I18nError {
    /// Helper to create a catalog load error
    pub fn catalog_load(
        category: impl Into<String>,
        language: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::CatalogLoad {
            category: category.into(),
            language: language.into(),
            message: message.to_string(),
        }
    }

    /// Helper to create a catalog format error
    pub fn catalog_format(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::CatalogFormat { path: path.into(), message: message.to_string() }
    }

    /// Helper to create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Helper to create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn error_code(&self) -> i32 {
        match self {
            Self::InvalidLocale(_) => 1001,

            Self::CatalogLoad { .. } => 2001,
            Self::CatalogFormat { .. } => 2002,

            Self::UnknownCategory(_) => 3001,

            Self::InvalidConfig(_) => 4001,
            Self::InvalidInput(_) => 4002,

            Self::Database(_) => 5002,
            Self::Migration(_) => 5003,
            Self::Other(_) => 5000,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

impl IntoResponse for I18nError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = match code {
            1001..=1999 => StatusCode::BAD_REQUEST,
            3000..=3999 => StatusCode::NOT_FOUND,
            4001..=4999 => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let response = ErrorResponse { code, message: self.to_string() };
        (status, Json(response)).into_response()
    }
}

pub type I18nResult<T> = Result<T, I18nError>;
