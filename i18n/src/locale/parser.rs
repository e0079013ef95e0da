//! BCP 47 locale string parser
//!
//! Grammar branches are tried in the order the RFC lists them: irregular
//! grandfathered tags, regular grandfathered tags, the structured language
//! tag, then a private-use-only tag. An optional ICU style keyword block
//! (`@currency=EUR;collation=phonebook`) may follow any of them.
//!
//! See <https://tools.ietf.org/html/bcp47>.

use super::error::{ParseError, ParseResult};
use super::tag::LocaleTag;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const IRREGULAR: &str = "en-GB-oed|i-ami|i-bnn|i-default|i-enochian|i-hak|i-klingon|i-lux|\
                         i-mingo|i-navajo|i-pwn|i-tao|i-tay|i-tsu|sgn-BE-FR|sgn-BE-NL|sgn-CH-DE";

const REGULAR: &str =
    "art-lojban|cel-gaulish|no-bok|no-nyn|zh-guoyu|zh-hakka|zh-min-nan|zh-min|zh-xiang";

static BCP47_REGEX: Lazy<Regex> = Lazy::new(|| {
    let grandfathered = format!("(?P<grandfathered>(?i:{IRREGULAR}|{REGULAR}))");
    let private = r"x(?:-[A-Za-z0-9]{1,8})+";
    let singleton = "[0-9A-WY-Za-wy-z]";
    let extensions = format!(r"(?P<extensions>(?:-{singleton}(?:-[A-Za-z0-9]{{2,8}})+)*)");
    let variants = r"(?P<variants>(?:-(?:[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*)";
    let region = r"(?:-(?P<region>[A-Za-z]{2}|[0-9]{3}))?";
    let script = r"(?:-(?P<script>[A-Za-z]{4}))?";
    let extended_language = r"(?:-(?P<extlang>[A-Za-z]{3}(?:-[A-Za-z]{3}){0,2}))?";
    // The 4-8 letter form comes first, matching the ABNF alternative order.
    let language =
        format!("(?:(?P<language_long>[A-Za-z]{{4,8}})|(?P<language>[A-Za-z]{{2,3}}){extended_language})");
    let language_tag = format!(
        "{language}{script}{region}{variants}{extensions}(?:-(?P<private>{private}))?"
    );
    let pattern = format!(
        "^(?:{grandfathered}|{language_tag}|(?P<private_only>{private}))(?:@(?P<keywords>.*))?$"
    );

    Regex::new(&pattern).expect("BCP 47 pattern is valid")
});

/// Parse a BCP 47 string into a [`LocaleTag`].
pub fn parse(input: &str) -> ParseResult<LocaleTag> {
    let caps = BCP47_REGEX
        .captures(input)
        .ok_or_else(|| ParseError::new(input))?;

    let mut tag = LocaleTag::default();
    tag.language = captured(&caps, "language_long")
        .or_else(|| captured(&caps, "language"))
        .map(|language| language.to_ascii_lowercase());
    tag.extended_language = captured(&caps, "extlang").map(str::to_string);
    tag.script = captured(&caps, "script").map(title_case);
    tag.region = captured(&caps, "region").map(|region| region.to_ascii_uppercase());
    tag.variant = captured(&caps, "variants").map(strip_separator);
    tag.extension = captured(&caps, "extensions").map(strip_separator);
    tag.private = captured(&caps, "private")
        .or_else(|| captured(&caps, "private_only"))
        .map(str::to_string);
    tag.grandfathered = captured(&caps, "grandfathered").map(str::to_string);

    if let Some(keywords) = captured(&caps, "keywords") {
        apply_keywords(&mut tag, keywords);
    }

    Ok(tag)
}

/// Returns a named group only when it matched something non-empty.
fn captured<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty())
}

/// Repeated groups are captured with their leading `-`.
fn strip_separator(value: &str) -> String {
    value.strip_prefix('-').unwrap_or(value).to_string()
}

pub(crate) fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Merge `key=value;key=value` pairs. Unknown keys and pairs without `=`
/// are ignored.
fn apply_keywords(tag: &mut LocaleTag, keywords: &str) {
    for pair in keywords.split(';') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = Some(value.to_string()).filter(|v| !v.is_empty());
        match key {
            "currency" => tag.currency = value,
            "collation" => tag.collation = value,
            "calendar" => tag.calendar = value,
            "numbers" => tag.numbers = value,
            _ => {}
        }
    }
}
