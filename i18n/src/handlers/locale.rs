use axum::{Json, extract::Path};

use crate::locale::LocaleTag;
use crate::models::LocaleResponse;
use crate::utils::I18nResult;

// Parse a locale tag
#[utoipa::path(
    get,
    path = "/api/locales/{tag}",
    params(
        ("tag" = String, Path, description = "BCP 47 locale tag, e.g. zh-cmn-Hans-CN")
    ),
    responses(
        (status = 200, description = "Parsed locale", body = LocaleResponse),
        (status = 400, description = "Invalid locale tag")
    ),
    tag = "Locales"
)]
pub async fn parse_locale(Path(tag): Path<String>) -> I18nResult<Json<LocaleResponse>> {
    tracing::debug!("Parsing locale: {}", tag);

    let locale = LocaleTag::try_from(tag.as_str())?;

    Ok(Json(LocaleResponse::from(&locale)))
}
