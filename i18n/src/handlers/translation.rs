use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use crate::AppState;
use crate::locale::LocaleTag;
use crate::middleware::RequestLocale;
use crate::models::{CacheClearedResponse, MessagesResponse, TranslateQuery, TranslateResponse};
use crate::services::Params;
use crate::utils::I18nResult;

// Translate a single message
#[utoipa::path(
    get,
    path = "/api/translate",
    params(TranslateQuery),
    responses(
        (status = 200, description = "Translated message", body = TranslateResponse),
        (status = 400, description = "Invalid locale tag")
    ),
    tag = "Translations"
)]
pub async fn translate(
    State(state): State<Arc<AppState>>,
    locale: Option<Extension<RequestLocale>>,
    Query(query): Query<TranslateQuery>,
) -> I18nResult<Json<TranslateResponse>> {
    let language = match query.language {
        Some(language) => LocaleTag::try_from(language.as_str())?.to_string(),
        None => locale
            .map(|Extension(RequestLocale(tag))| tag)
            .unwrap_or_else(|| state.default_locale.clone())
            .to_string(),
    };
    tracing::debug!("Translating {}/{}: {}", language, query.category, query.message);

    let translation = state
        .translator
        .translate(&query.category, &query.message, &Params::new(), &language)
        .await;

    Ok(Json(TranslateResponse {
        category: query.category,
        message: query.message,
        language,
        translation,
    }))
}

// Get the message catalog of a category
#[utoipa::path(
    get,
    path = "/api/messages/{category}/{language}",
    params(
        ("category" = String, Path, description = "Message category"),
        ("language" = String, Path, description = "Locale tag")
    ),
    responses(
        (status = 200, description = "Message catalog", body = MessagesResponse),
        (status = 404, description = "No message source for the category")
    ),
    tag = "Translations"
)]
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path((category, language)): Path<(String, String)>,
) -> I18nResult<Json<MessagesResponse>> {
    let language = LocaleTag::try_from(language.as_str())?.to_string();
    tracing::debug!("Getting messages: {}/{}", language, category);

    let catalog = state.translator.get_messages(&category, &language).await?;

    tracing::debug!("Retrieved {} messages for {}/{}", catalog.len(), language, category);
    Ok(Json(MessagesResponse {
        category,
        language,
        loaded_at: catalog.loaded_at(),
        messages: catalog.messages().into_iter().collect(),
    }))
}

// Drop every cached catalog
#[utoipa::path(
    delete,
    path = "/api/messages/cache",
    responses(
        (status = 200, description = "Cache cleared", body = CacheClearedResponse)
    ),
    tag = "Translations"
)]
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<CacheClearedResponse> {
    state.translator.clear_cache();
    tracing::info!("Message catalog cache cleared");
    Json(CacheClearedResponse { cleared: true })
}
