//! BCP 47 locale tags
//!
//! Parsing, composition and fallback derivation for locale identifiers
//! such as `en-US`, `zh-cmn-Hans-CN` or `sr-Latn-RS-REVISED@currency=RSD`.

pub mod error;
pub mod parser;
pub mod tag;

pub use error::{ParseError, ParseResult};
pub use parser::parse;
pub use tag::LocaleTag;

/// Primary language subtag of `language`, e.g. `de` for `de-DE` or `de_AT`.
///
/// Grandfathered and private-use-only tags are their own primary language.
/// Unparsable input falls back to its first `-`/`_` separated piece.
pub fn primary_language(language: &str) -> String {
    match parse(&language.replace('_', "-")) {
        Ok(tag) => match tag.language() {
            Some(primary) => primary.to_string(),
            None => tag.to_string(),
        },
        Err(_) => language
            .split(['-', '_'])
            .next()
            .unwrap_or(language)
            .to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("de-DE"), "de");
        assert_eq!(primary_language("de_AT"), "de");
        assert_eq!(primary_language("zh-Hans-CN"), "zh");
        assert_eq!(primary_language("en"), "en");
        assert_eq!(primary_language("i-klingon"), "i-klingon");
        assert_eq!(primary_language("x-private"), "x-private");
        assert_eq!(primary_language("_broken"), "");
    }
}
