//! Message catalog cache with single-flight loading
//!
//! - One slot per `(category, language)` key
//! - Concurrent callers for an uncached key share a single loader invocation
//! - Optional TTL; expired slots are swapped for fresh ones on next access
//! - A failed load leaves the slot empty so the next call retries

use crate::utils::I18nResult;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

/// Source message to translated message.
pub type Messages = HashMap<String, String>;

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Translated(String),
    /// A miss already reported to the missing translation handler
    Missing,
}

/// Translations for one `(category, language)` pair.
#[derive(Debug)]
pub struct MessageCatalog {
    entries: RwLock<HashMap<String, CatalogEntry>>,
    loaded_at: DateTime<Utc>,
    created_at: Instant,
    /// `None` keeps the catalog for the process lifetime
    ttl: Option<Duration>,
}

impl MessageCatalog {
    pub fn new(messages: Messages, ttl: Option<Duration>) -> Self {
        let entries = messages
            .into_iter()
            .map(|(message, translation)| (message, CatalogEntry::Translated(translation)))
            .collect();
        Self {
            entries: RwLock::new(entries),
            loaded_at: Utc::now(),
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.ttl.is_none_or(|ttl| self.created_at.elapsed() < ttl)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn get(&self, message: &str) -> Option<CatalogEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(message)
            .cloned()
    }

    /// Non-empty translation of `message`, if any.
    pub fn translation(&self, message: &str) -> Option<String> {
        match self.get(message) {
            Some(CatalogEntry::Translated(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Marks `message` as missing unless it already is or has a translation.
    ///
    /// Returns `true` for the single caller that placed the marker.
    pub fn claim_miss(&self, message: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get(message) {
            Some(CatalogEntry::Missing) => false,
            Some(CatalogEntry::Translated(text)) if !text.is_empty() => false,
            _ => {
                entries.insert(message.to_string(), CatalogEntry::Missing);
                true
            }
        }
    }

    pub fn record(&self, message: &str, entry: CatalogEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(message.to_string(), entry);
    }

    /// Translations as loaded or supplied by a fallback; miss markers are skipped.
    pub fn messages(&self) -> Messages {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|(message, entry)| match entry {
                CatalogEntry::Translated(text) => Some((message.clone(), text.clone())),
                CatalogEntry::Missing => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Cache
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogKey {
    pub category: String,
    pub language: String,
}

impl CatalogKey {
    pub fn new(category: impl Into<String>, language: impl Into<String>) -> Self {
        Self { category: category.into(), language: language.into() }
    }
}

type Slot = Arc<OnceCell<Arc<MessageCatalog>>>;

/// Thread-safe catalog cache
pub struct CatalogCache {
    slots: DashMap<CatalogKey, Slot>,
    ttl: Option<Duration>,
}

impl CatalogCache {
    /// Cache that keeps catalogs until invalidated
    pub fn new() -> Self {
        Self { slots: DashMap::new(), ttl: None }
    }

    /// Create with a TTL in seconds; 0 means never expire
    pub fn with_ttl(ttl_seconds: u64) -> Self {
        Self {
            slots: DashMap::new(),
            ttl: (ttl_seconds > 0).then(|| Duration::from_secs(ttl_seconds)),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Valid cached catalog for `key`, without loading.
    pub fn get(&self, key: &CatalogKey) -> Option<Arc<MessageCatalog>> {
        self.slots
            .get(key)
            .and_then(|slot| slot.value().get().cloned())
            .filter(|catalog| catalog.is_valid())
    }

    /// Returns the cached catalog or runs `load` once for all concurrent callers.
    pub async fn get_or_load<F, Fut>(&self, key: &CatalogKey, load: F) -> I18nResult<Arc<MessageCatalog>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = I18nResult<Messages>>,
    {
        let slot = self.slot(key);
        let ttl = self.ttl;
        let result = slot
            .get_or_try_init(|| async move {
                let messages = load().await?;
                tracing::debug!(
                    "Cached {} messages for {}/{}",
                    messages.len(),
                    key.language,
                    key.category
                );
                Ok::<_, crate::utils::I18nError>(Arc::new(MessageCatalog::new(messages, ttl)))
            })
            .await;

        match result {
            Ok(catalog) => Ok(Arc::clone(catalog)),
            Err(e) => {
                // Failed loads must not pin a slot for the key.
                self.slots
                    .remove_if(key, |_, current| Arc::ptr_eq(current, &slot) && current.get().is_none());
                Err(e)
            }
        }
    }

    fn slot(&self, key: &CatalogKey) -> Slot {
        self.slots
            .remove_if(key, |_, slot| slot.get().is_some_and(|catalog| !catalog.is_valid()));
        let slot = self.slots.entry(key.clone()).or_default();
        Arc::clone(slot.value())
    }

    pub fn invalidate(&self, key: &CatalogKey) -> bool {
        self.slots.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of loaded catalogs
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}
