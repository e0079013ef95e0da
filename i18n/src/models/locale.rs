use serde::Serialize;
use utoipa::ToSchema;

use crate::locale::LocaleTag;

/// Parsed subtags of a locale tag
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct LocaleResponse {
    /// Composed, case-normalized form
    pub tag: String,
    pub language: Option<String>,
    pub extended_language: Option<String>,
    pub script: Option<String>,
    pub region: Option<String>,
    pub variant: Option<String>,
    pub extension: Option<String>,
    pub private: Option<String>,
    pub grandfathered: Option<String>,
    pub currency: Option<String>,
    pub collation: Option<String>,
    pub calendar: Option<String>,
    pub numbers: Option<String>,
    /// Tags from most to least specific
    pub fallback_chain: Vec<String>,
}

impl From<&LocaleTag> for LocaleResponse {
    fn from(tag: &LocaleTag) -> Self {
        let owned = |value: Option<&str>| value.map(str::to_string);
        Self {
            tag: tag.to_string(),
            language: owned(tag.language()),
            extended_language: owned(tag.extended_language()),
            script: owned(tag.script()),
            region: owned(tag.region()),
            variant: owned(tag.variant()),
            extension: owned(tag.extension()),
            private: owned(tag.private()),
            grandfathered: owned(tag.grandfathered()),
            currency: owned(tag.currency()),
            collation: owned(tag.collation()),
            calendar: owned(tag.calendar()),
            numbers: owned(tag.numbers()),
            fallback_chain: tag.fallback_chain().map(|t| t.to_string()).collect(),
        }
    }
}
