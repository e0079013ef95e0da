use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TranslateQuery {
    pub category: String,
    pub message: String,
    /// Target locale; the request's `Accept-Language` locale when omitted
    pub language: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct TranslateResponse {
    pub category: String,
    pub message: String,
    pub language: String,
    pub translation: String,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct MessagesResponse {
    pub category: String,
    pub language: String,
    pub loaded_at: DateTime<Utc>,
    /// Sorted by source message
    pub messages: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct CacheClearedResponse {
    pub cleared: bool,
}
