//! `Accept-Language` header negotiation

use crate::locale::LocaleTag;

/// Language ranges from an `Accept-Language` value, best first.
///
/// Entries are ordered by descending `q` (default 1.0), keeping header
/// order for ties. Wildcards, `q=0` and unparsable tags are skipped.
pub fn parse_accept_language(header: &str) -> Vec<LocaleTag> {
    let mut ranges: Vec<(f32, usize, LocaleTag)> = header
        .split(',')
        .enumerate()
        .filter_map(|(position, item)| {
            let mut parts = item.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }

            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            if quality <= 0.0 {
                return None;
            }

            let tag = LocaleTag::try_from(tag.replace('_', "-").as_str()).ok()?;
            Some((quality, position, tag))
        })
        .collect();

    ranges.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    ranges.into_iter().map(|(_, _, tag)| tag).collect()
}

/// Preferred locale from an optional header value, or `default`.
pub fn negotiate_locale(header_value: Option<&str>, default: &LocaleTag) -> LocaleTag {
    header_value
        .and_then(|value| parse_accept_language(value).into_iter().next())
        .unwrap_or_else(|| default.clone())
}
