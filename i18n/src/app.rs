//! Application wiring: translator construction, HTTP router and server.

use axum::{Json, Router, middleware as axum_middleware, routing::get};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::{BackendConfig, Config, SourceConfig};
use crate::handlers;
use crate::locale::LocaleTag;
use crate::middleware::locale_middleware;
use crate::models::{
    CacheClearedResponse, LocaleResponse, MessagesResponse, TranslateResponse,
};
use crate::services::{
    DbMessageLoader, FileMessageLoader, LogMissingTranslations, MessageLoader, MessageSource,
    Translator,
};
use crate::utils::{ErrorResponse, I18nResult};

/// Shared state handed to every handler
pub struct AppState {
    pub translator: Arc<Translator>,
    pub default_locale: LocaleTag,
}

impl AppState {
    pub fn new(translator: Arc<Translator>, default_locale: LocaleTag) -> Self {
        Self { translator, default_locale }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::locale::parse_locale,
        handlers::translation::translate,
        handlers::translation::get_messages,
        handlers::translation::clear_cache,
    ),
    components(schemas(
        LocaleResponse,
        TranslateResponse,
        MessagesResponse,
        CacheClearedResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Locales", description = "BCP 47 locale parsing"),
        (name = "Translations", description = "Message lookup with language fallback")
    ),
    info(title = "langtag-i18n", description = "Locale parsing and message translation API")
)]
pub struct ApiDoc;

/// Open the SQLite pool, creating the database file if needed.
pub async fn connect_database(url: &str) -> I18nResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
    tracing::info!("Connected to database: {}", url);
    Ok(pool)
}

/// Build the message source described by `config`.
pub fn build_source(config: &SourceConfig, pool: Option<&SqlitePool>) -> I18nResult<MessageSource> {
    let loader: Arc<dyn MessageLoader> = match &config.backend {
        BackendConfig::File { base_path, file_map } => {
            Arc::new(FileMessageLoader::new(base_path).with_file_map(file_map.clone()))
        }
        BackendConfig::Db { source_message_table, message_table } => {
            let pool = pool.ok_or_else(|| {
                crate::utils::I18nError::invalid_config(format!(
                    "source '{}' needs a database connection",
                    config.pattern
                ))
            })?;
            Arc::new(
                DbMessageLoader::new(pool.clone())
                    .with_tables(source_message_table, message_table)?,
            )
        }
    };

    Ok(MessageSource::new(loader)
        .with_source_language(&config.source_language)
        .with_force_translation(config.force_translation)
        .with_caching_duration(config.caching_duration)
        .with_missing_handler(Arc::new(LogMissingTranslations)))
}

/// Build the translator with one source per configured pattern.
pub fn build_translator(config: &Config, pool: Option<&SqlitePool>) -> I18nResult<Translator> {
    let mut translator = Translator::new();
    for source in &config.translator.sources {
        tracing::info!(
            "Registering message source '{}' ({:?}, source language {})",
            source.pattern,
            source.backend,
            source.source_language
        );
        translator.add_source(&source.pattern, Arc::new(build_source(source, pool)?));
    }
    Ok(translator)
}

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/locales/:tag", get(handlers::locale::parse_locale))
        .route("/api/translate", get(handlers::translation::translate))
        .route("/api/messages/cache", axum::routing::delete(handlers::translation::clear_cache))
        .route("/api/messages/:category/:language", get(handlers::translation::get_messages))
        .layer(axum_middleware::from_fn_with_state(state.clone(), locale_middleware))
        .with_state(state);

    Router::new()
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the HTTP API until the process receives Ctrl-C.
pub async fn serve(config: &Config, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
