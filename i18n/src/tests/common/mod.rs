// Common test utilities and helpers

use crate::services::catalog_cache::Messages;
use crate::services::message_source::{MemoryMessageLoader, MessageLoader};
use crate::services::missing_translation::{MissingTranslation, MissingTranslationHandler};
use crate::utils::{I18nError, I18nResult};
use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Directory holding the `<language>/<category>` message fixtures
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/messages")
}

/// Memory loader that counts loads, can be slowed down and can fail
/// for selected languages.
#[derive(Default)]
pub struct CountingLoader {
    pub inner: MemoryMessageLoader,
    pub loads: AtomicUsize,
    pub delay: Option<Duration>,
    pub failing: HashSet<String>,
}

impl CountingLoader {
    pub fn new(inner: MemoryMessageLoader) -> Self {
        Self { inner, ..Self::default() }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_for(mut self, language: &str) -> Self {
        self.failing.insert(language.to_string());
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageLoader for CountingLoader {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn load_exact(&self, category: &str, language: &str) -> I18nResult<Option<Messages>> {
        self.inner.load_exact(category, language).await
    }

    async fn load_messages(
        &self,
        category: &str,
        language: &str,
        source_language: &str,
    ) -> I18nResult<Messages> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(language) {
            return Err(I18nError::catalog_load(category, language, "store unavailable"));
        }
        self.inner.load_messages(category, language, source_language).await
    }
}

/// Records every missing translation event and answers with canned fallbacks.
#[derive(Default)]
pub struct RecordingHandler {
    pub events: Mutex<Vec<MissingTranslation>>,
    pub fallbacks: HashMap<String, String>,
}

impl RecordingHandler {
    pub fn with_fallback(mut self, message: &str, fallback: &str) -> Self {
        self.fallbacks.insert(message.to_string(), fallback.to_string());
        self
    }

    /// `(category, message, language)` of every recorded event
    pub fn events(&self) -> Vec<(String, String, String)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| (e.category().to_string(), e.message().to_string(), e.language().to_string()))
            .collect()
    }
}

impl MissingTranslationHandler for RecordingHandler {
    fn handle(&self, event: &mut MissingTranslation) {
        if let Some(fallback) = self.fallbacks.get(event.message()) {
            event.set_fallback(fallback.clone());
        }
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn recording_handler() -> Arc<RecordingHandler> {
    Arc::new(RecordingHandler::default())
}
