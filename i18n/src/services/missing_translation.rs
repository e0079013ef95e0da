//! Missing translation notification
//!
//! A [`MessageSource`](super::MessageSource) calls its handler when a message
//! has no translation. The handler may supply a fallback string, which is
//! then cached as if it had been loaded.

/// Event passed to a [`MissingTranslationHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslation {
    category: String,
    message: String,
    language: String,
    fallback: Option<String>,
}

impl MissingTranslation {
    pub fn new(
        category: impl Into<String>,
        message: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
            language: language.into(),
            fallback: None,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Message key; source messages are their own ids.
    pub fn id(&self) -> &str {
        &self.message
    }

    pub fn set_fallback(&mut self, translation: impl Into<String>) {
        self.fallback = Some(translation.into());
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn into_fallback(self) -> Option<String> {
        self.fallback
    }
}

/// Listener for missing translations.
pub trait MissingTranslationHandler: Send + Sync {
    fn handle(&self, event: &mut MissingTranslation);
}

impl<F> MissingTranslationHandler for F
where
    F: Fn(&mut MissingTranslation) + Send + Sync,
{
    fn handle(&self, event: &mut MissingTranslation) {
        self(event)
    }
}

/// Logs every missing translation and supplies no fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMissingTranslations;

impl MissingTranslationHandler for LogMissingTranslations {
    fn handle(&self, event: &mut MissingTranslation) {
        tracing::warn!(
            category = event.category(),
            language = event.language(),
            "Missing translation: {}",
            event.message()
        );
    }
}
