//! Message parameter substitution
//!
//! Full ICU MessageFormat (plural, select, number skeletons) is left to
//! external formatters plugged in through [`MessageFormatter`]. The default
//! [`PlaceholderFormatter`] performs a single pass of `{name}` replacement.

use std::collections::HashMap;

pub type Params = HashMap<String, String>;

pub trait MessageFormatter: Send + Sync {
    /// Format `message` with `params` using the rules of `language`.
    fn format(&self, message: &str, params: &Params, language: &str) -> String;
}

/// Replaces `{name}` and `{name, type, ...}` tokens.
///
/// - `{name}` becomes `params["name"]`, or stays as-is when absent.
/// - `{name, number}` becomes the value, or is reduced to `{name}` when absent.
/// - Tokens containing nested braces (plural/select) are left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderFormatter;

impl MessageFormatter for PlaceholderFormatter {
    fn format(&self, message: &str, params: &Params, _language: &str) -> String {
        if params.is_empty() && !message.contains(',') {
            return message.to_string();
        }

        let mut out = String::with_capacity(message.len());
        let mut rest = message;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let token_and_tail = &rest[start..];
            match matching_brace(token_and_tail) {
                Some(end) => {
                    let token = &token_and_tail[..=end];
                    out.push_str(&substitute(token, params));
                    rest = &token_and_tail[end + 1..];
                }
                None => {
                    // Unbalanced: copy verbatim.
                    out.push_str(token_and_tail);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Byte index of the `}` closing the `{` at index 0.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn substitute(token: &str, params: &Params) -> String {
    let inner = &token[1..token.len() - 1];
    if inner.contains('{') {
        return token.to_string();
    }

    let (name, has_type) = match inner.split_once(',') {
        Some((name, _)) => (name.trim(), true),
        None => (inner.trim(), false),
    };

    match params.get(name) {
        Some(value) => value.clone(),
        None if has_type => format!("{{{name}}}"),
        None => token.to_string(),
    }
}

/// Build [`Params`] from `key=value` strings.
pub fn params_from_pairs<I, S>(pairs: I) -> Params
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pairs
        .into_iter()
        .filter_map(|pair| {
            pair.as_ref()
                .split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_simple_substitution() {
        let f = PlaceholderFormatter;
        assert_eq!(
            f.format("His speed is about {n} km/h.", &params(&[("n", "42")]), "en-US"),
            "His speed is about 42 km/h."
        );
    }

    #[test]
    fn test_missing_param_left_as_is() {
        let f = PlaceholderFormatter;
        assert_eq!(
            f.format("His speed is about {0} km/h.", &Params::new(), "en-US"),
            "His speed is about {0} km/h."
        );
    }

    #[test]
    fn test_typed_placeholder_without_param_is_reduced() {
        let f = PlaceholderFormatter;
        let message = "Incorrect password (length must be from {min, number} to {max, number} symbols).";
        assert_eq!(
            f.format(message, &params(&[("attribute", "password")]), "en"),
            "Incorrect password (length must be from {min} to {max} symbols)."
        );
    }

    #[test]
    fn test_typed_placeholder_with_param() {
        let f = PlaceholderFormatter;
        assert_eq!(
            f.format(
                "His name is {name} and his speed is about {n, number} km/h.",
                &params(&[("name", "DA VINCI"), ("n", "42")]),
                "en-US"
            ),
            "His name is DA VINCI and his speed is about 42 km/h."
        );
    }

    #[test]
    fn test_nested_tokens_untouched() {
        let f = PlaceholderFormatter;
        let message = "There {n, plural, =0{are no cats} other{are # cats}} here, {who}!";
        assert_eq!(
            f.format(message, &params(&[("n", "3"), ("who", "Bob")]), "en"),
            "There {n, plural, =0{are no cats} other{are # cats}} here, Bob!"
        );
    }

    #[test]
    fn test_unbalanced_braces() {
        let f = PlaceholderFormatter;
        assert_eq!(f.format("oops {n", &params(&[("n", "1")]), "en"), "oops {n");
        assert_eq!(f.format("a } b {n}", &params(&[("n", "1")]), "en"), "a } b 1");
    }

    #[test]
    fn test_params_from_pairs() {
        let p = params_from_pairs(["n=42", "name=Da=Vinci", "broken"]);
        assert_eq!(p.get("n").map(String::as_str), Some("42"));
        assert_eq!(p.get("name").map(String::as_str), Some("Da=Vinci"));
        assert_eq!(p.len(), 2);
    }
}
