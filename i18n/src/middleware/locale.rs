//! Locale negotiation middleware
//!
//! Picks the preferred locale from the Accept-Language header and stores
//! it in the request extensions for handlers to access.

use axum::{
    extract::{Request, State},
    http::header::ACCEPT_LANGUAGE,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::AppState;
use crate::locale::LocaleTag;
use crate::utils::negotiate_locale;

/// Locale negotiated for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale(pub LocaleTag);

/// Middleware to extract locale from Accept-Language header
pub async fn locale_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let header = req.headers().get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let locale = negotiate_locale(header, &state.default_locale);

    tracing::trace!("Request locale: {}", locale);
    req.extensions_mut().insert(RequestLocale(locale));

    next.run(req).await
}
