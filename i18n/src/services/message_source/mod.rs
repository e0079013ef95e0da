//! Message sources
//!
//! A [`MessageSource`] owns a catalog cache and a pluggable
//! [`MessageLoader`] that fetches translations for one
//! `(category, language)` pair at a time.
//!
//! # Architecture
//! ```text
//! ┌───────────────┐     ┌──────────────┐
//! │ MessageSource │────▶│ CatalogCache │
//! └───────┬───────┘     └──────────────┘
//!         │ MessageLoader
//!    ┌────┼─────────────┐
//!    ▼    ▼             ▼
//! ┌────┐ ┌──────────┐ ┌────────┐
//! │File│ │ Database │ │ Memory │
//! └────┘ └──────────┘ └────────┘
//! ```

mod db_loader;
mod file_loader;
mod memory_loader;

pub use db_loader::{DEFAULT_MESSAGE_TABLE, DEFAULT_SOURCE_MESSAGE_TABLE, DbMessageLoader};
pub use file_loader::{FileMessageLoader, MessageFileFormat};
pub use memory_loader::MemoryMessageLoader;

use crate::locale::{LocaleTag, primary_language};
use crate::services::catalog_cache::{
    CatalogCache, CatalogEntry, CatalogKey, MessageCatalog, Messages,
};
use crate::services::missing_translation::{MissingTranslation, MissingTranslationHandler};
use crate::utils::I18nResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_SOURCE_LANGUAGE: &str = "en-US";

/// Backing store for translated messages.
#[async_trait]
pub trait MessageLoader: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Messages stored for exactly `language`; `None` when nothing is stored.
    async fn load_exact(&self, category: &str, language: &str) -> I18nResult<Option<Messages>>;

    /// Messages for `language` with gaps filled from its fallback language.
    ///
    /// For a specific language such as `de-DE` the parent language (`de`)
    /// fills keys that are absent or empty. When `language` is the bare
    /// form of `source_language`, the source language fills them instead.
    async fn load_messages(
        &self,
        category: &str,
        language: &str,
        source_language: &str,
    ) -> I18nResult<Messages> {
        let messages = self.load_exact(category, language).await?;

        let Some(fallback) = fallback_language(language, source_language) else {
            if messages.is_none() {
                warn!(
                    "[{}] No messages for category '{}' in '{}'",
                    self.name(),
                    category,
                    language
                );
            }
            return Ok(messages.unwrap_or_default());
        };

        let fallback_messages = self.load_exact(category, &fallback).await?;
        if messages.is_none()
            && fallback_messages.is_none()
            && fallback != source_language
            && fallback != primary_language(source_language)
        {
            warn!(
                "[{}] No messages for category '{}' in '{}' or fallback '{}'",
                self.name(),
                category,
                language,
                fallback
            );
        }

        Ok(merge_fallback(messages, fallback_messages))
    }
}

/// Language whose messages fill the gaps of `language` at load time.
///
/// The next less specific tag (`de-DE` -> `de`, `sr-Latn-RS` -> `sr-Latn`),
/// or the source language when `language` is its bare form.
pub(crate) fn fallback_language(language: &str, source_language: &str) -> Option<String> {
    if let Some(parent) = parent_language(language) {
        Some(parent)
    } else if language == primary_language(source_language) && language != source_language {
        Some(source_language.to_string())
    } else {
        None
    }
}

fn parent_language(language: &str) -> Option<String> {
    let parent = match LocaleTag::try_from(language.replace('_', "-").as_str()) {
        Ok(tag) => {
            let base = tag.without_keywords();
            if base != tag { base.to_string() } else { tag.fallback().to_string() }
        }
        Err(_) => primary_language(language),
    };
    (!parent.is_empty() && parent != language).then_some(parent)
}

/// Fill absent or empty entries of `messages` from `fallback`.
pub(crate) fn merge_fallback(messages: Option<Messages>, fallback: Option<Messages>) -> Messages {
    match (messages, fallback) {
        (None, None) => Messages::new(),
        (Some(messages), None) => messages,
        (None, Some(fallback)) => fallback,
        (Some(messages), Some(fallback)) if messages.is_empty() => fallback,
        (Some(mut messages), Some(fallback)) => {
            for (key, translation) in fallback {
                if translation.is_empty() {
                    continue;
                }
                let entry = messages.entry(key).or_default();
                if entry.is_empty() {
                    *entry = translation;
                }
            }
            messages
        }
    }
}

/// Translation repository for one or more message categories.
pub struct MessageSource {
    source_language: String,
    force_translation: bool,
    loader: Arc<dyn MessageLoader>,
    cache: CatalogCache,
    missing_handler: Option<Arc<dyn MissingTranslationHandler>>,
}

impl MessageSource {
    pub fn new(loader: Arc<dyn MessageLoader>) -> Self {
        Self {
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            force_translation: false,
            loader,
            cache: CatalogCache::new(),
            missing_handler: None,
        }
    }

    /// Language the source messages are written in
    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    /// Translate even when the target language equals the source language
    pub fn with_force_translation(mut self, force_translation: bool) -> Self {
        self.force_translation = force_translation;
        self
    }

    /// Seconds a loaded catalog stays cached; 0 caches for the process lifetime
    pub fn with_caching_duration(mut self, seconds: u64) -> Self {
        self.cache = CatalogCache::with_ttl(seconds);
        self
    }

    pub fn with_missing_handler(mut self, handler: Arc<dyn MissingTranslationHandler>) -> Self {
        self.missing_handler = Some(handler);
        self
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn force_translation(&self) -> bool {
        self.force_translation
    }

    pub fn loader_name(&self) -> &'static str {
        self.loader.name()
    }

    /// Whether a lookup is needed for `language` at all.
    pub fn needs_translation(&self, language: &str) -> bool {
        self.force_translation || language != self.source_language
    }

    /// All messages for `category` in `language`, loaded at most once per key.
    pub async fn get_messages(&self, category: &str, language: &str) -> I18nResult<Arc<MessageCatalog>> {
        let key = CatalogKey::new(category, language);
        self.cache
            .get_or_load(&key, move || async move {
                debug!(
                    "[{}] Loading messages for {}/{}",
                    self.loader.name(),
                    language,
                    category
                );
                self.loader
                    .load_messages(category, language, &self.source_language)
                    .await
            })
            .await
    }

    /// Looks `message` up without notifying the missing translation handler.
    ///
    /// A catalog that fails to load is logged and treated as empty.
    pub async fn lookup(&self, category: &str, message: &str, language: &str) -> Option<String> {
        match self.get_messages(category, language).await {
            Ok(catalog) => catalog.translation(message),
            Err(e) => {
                warn!("Treating {}/{} as empty: {}", language, category, e);
                None
            }
        }
    }

    /// Translates `message` into `language`.
    ///
    /// Returns `None` when no translation is needed (same language, not
    /// forced) or none could be found. A miss notifies the handler once;
    /// a supplied fallback is cached like a loaded translation.
    pub async fn translate(&self, category: &str, message: &str, language: &str) -> Option<String> {
        if !self.needs_translation(language) {
            return None;
        }
        if let Some(translation) = self.lookup(category, message, language).await {
            return Some(translation);
        }
        self.resolve_missing(category, message, language).await
    }

    /// Reports a miss for `(category, message, language)` at most once and
    /// records the outcome in the catalog.
    pub async fn resolve_missing(&self, category: &str, message: &str, language: &str) -> Option<String> {
        let catalog = self.get_messages(category, language).await.ok();

        if let Some(catalog) = &catalog {
            if let Some(translation) = catalog.translation(message) {
                return Some(translation);
            }
            if !catalog.claim_miss(message) {
                return None;
            }
        }

        debug!("Missing translation {}/{}: {}", language, category, message);
        let fallback = self.missing_handler.as_ref().and_then(|handler| {
            let mut event = MissingTranslation::new(category, message, language);
            handler.handle(&mut event);
            event.into_fallback().filter(|fallback| !fallback.is_empty())
        });

        if let (Some(catalog), Some(fallback)) = (&catalog, &fallback) {
            catalog.record(message, CatalogEntry::Translated(fallback.clone()));
        }
        fallback
    }

    pub fn invalidate(&self, category: &str, language: &str) -> bool {
        self.cache.invalidate(&CatalogKey::new(category, language))
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cached_catalogs(&self) -> usize {
        self.cache.len()
    }
}
