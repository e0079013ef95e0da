use super::MessageLoader;
use crate::services::catalog_cache::Messages;
use crate::utils::I18nResult;
use async_trait::async_trait;
use dashmap::DashMap;

/// Messages held in process memory, keyed by `(category, language)`.
#[derive(Debug, Default)]
pub struct MemoryMessageLoader {
    messages: DashMap<(String, String), Messages>,
}

impl MemoryMessageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_messages<I, K, V>(self, category: &str, language: &str, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert(category, language, messages);
        self
    }

    /// Adds or replaces translations for `category` in `language`.
    pub fn insert<I, K, V>(&self, category: &str, language: &str, messages: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entry = self
            .messages
            .entry((category.to_string(), language.to_string()))
            .or_default();
        entry.extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[async_trait]
impl MessageLoader for MemoryMessageLoader {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load_exact(&self, category: &str, language: &str) -> I18nResult<Option<Messages>> {
        Ok(self
            .messages
            .get(&(category.to_string(), language.to_string()))
            .map(|messages| messages.value().clone()))
    }
}
