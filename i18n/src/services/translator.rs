//! Fallback resolver
//!
//! Routes a message category to its [`MessageSource`] and resolves a
//! translation by walking from the requested locale towards less specific
//! ones, ending at the source language.

use crate::locale::{LocaleTag, primary_language};
use crate::services::catalog_cache::MessageCatalog;
use crate::services::formatter::{MessageFormatter, Params, PlaceholderFormatter};
use crate::services::message_source::MessageSource;
use crate::utils::{I18nError, I18nResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Matches every category
pub const WILDCARD: &str = "*";

pub struct Translator {
    /// `(pattern, source)` in registration order
    sources: Vec<(String, Arc<MessageSource>)>,
    formatter: Arc<dyn MessageFormatter>,
}

impl Translator {
    pub fn new() -> Self {
        Self { sources: Vec::new(), formatter: Arc::new(PlaceholderFormatter) }
    }

    /// Registers `source` for categories matching `pattern`.
    ///
    /// A pattern is an exact category, a `prefix*` or `*`.
    pub fn with_source(mut self, pattern: impl Into<String>, source: Arc<MessageSource>) -> Self {
        self.add_source(pattern, source);
        self
    }

    pub fn add_source(&mut self, pattern: impl Into<String>, source: Arc<MessageSource>) {
        let pattern = pattern.into();
        self.sources.retain(|(existing, _)| *existing != pattern);
        self.sources.push((pattern, source));
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn MessageFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(pattern, _)| pattern.as_str())
    }

    /// Source serving `category`: exact pattern, then the longest matching
    /// `prefix*`, then `*`.
    pub fn source_for(&self, category: &str) -> Option<&Arc<MessageSource>> {
        if let Some((_, source)) = self.sources.iter().find(|(pattern, _)| pattern == category) {
            return Some(source);
        }

        self.sources
            .iter()
            .filter_map(|(pattern, source)| {
                let prefix = pattern.strip_suffix('*')?;
                category.starts_with(prefix).then_some((prefix.len(), source))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, source)| source)
    }

    /// Translates and formats `message`; never fails.
    ///
    /// A miss degrades to the source message formatted with the source language.
    pub async fn translate(&self, category: &str, message: &str, params: &Params, language: &str) -> String {
        let Some(source) = self.source_for(category) else {
            warn!("Unable to locate message source for category '{}'", category);
            return self.format(message, params, language);
        };

        match self.resolve(source, category, message, language).await {
            Some(translation) => self.format(&translation, params, language),
            None => self.format(message, params, source.source_language()),
        }
    }

    /// Translation of `message` without formatting, `None` when the source
    /// text should be used.
    pub async fn resolve(
        &self,
        source: &MessageSource,
        category: &str,
        message: &str,
        language: &str,
    ) -> Option<String> {
        let candidates = candidate_languages(language, source.source_language());
        let target = candidates.first().map(String::as_str).unwrap_or(language);
        if !source.needs_translation(target) {
            return None;
        }

        for candidate in &candidates {
            if let Some(translation) = source.lookup(category, message, candidate).await {
                if candidate != target {
                    debug!("Resolved {}/{} via fallback language {}", target, category, candidate);
                }
                return Some(translation);
            }
        }

        source.resolve_missing(category, message, target).await
    }

    pub fn format(&self, message: &str, params: &Params, language: &str) -> String {
        self.formatter.format(message, params, language)
    }

    /// Catalog of `category` in `language` from the routed source.
    ///
    /// The language is canonicalized first, so `de_de` and `de-DE` share a
    /// catalog. An unparsable language is an error.
    pub async fn get_messages(&self, category: &str, language: &str) -> I18nResult<Arc<MessageCatalog>> {
        let source = self
            .source_for(category)
            .ok_or_else(|| I18nError::UnknownCategory(category.to_string()))?;
        let language = LocaleTag::try_from(language.replace('_', "-").as_str())?.to_string();
        source.get_messages(category, &language).await
    }

    /// Drops every cached catalog of every source.
    pub fn clear_cache(&self) {
        for (_, source) in &self.sources {
            source.clear();
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

/// Languages tried for `language`, most specific first.
///
/// The requested language in canonical form, its fallback chain without
/// keywords, its bare language, and finally `source_language` when both
/// share a bare language. An unparsable language is tried as given.
pub fn candidate_languages(language: &str, source_language: &str) -> Vec<String> {
    let parsed = LocaleTag::try_from(language.replace('_', "-").as_str());
    let first = match &parsed {
        Ok(tag) => tag.to_string(),
        Err(_) => language.to_string(),
    };
    let mut candidates = vec![first];
    let mut push = |candidate: String| {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    match parsed {
        Ok(tag) => {
            let tag = tag.without_keywords();
            for fallback in tag.fallback_chain() {
                push(fallback.to_string());
            }
            if let Some(bare) = tag.bare_language() {
                push(bare.to_string());
            }
        }
        Err(_) => push(primary_language(language)),
    }

    let bare = primary_language(language);
    if bare == primary_language(source_language) {
        push(source_language.to_string());
    }
    candidates
}
