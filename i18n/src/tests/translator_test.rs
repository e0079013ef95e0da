use crate::services::formatter::{MessageFormatter, Params};
use crate::services::message_source::{FileMessageLoader, MemoryMessageLoader, MessageSource};
use crate::services::translator::Translator;
use crate::tests::common::{CountingLoader, RecordingHandler, fixture_path, recording_handler};
use std::sync::Arc;

fn params(pairs: &[(&str, &str)]) -> Params {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn file_translator(handler: Arc<RecordingHandler>) -> Translator {
    let source = MessageSource::new(Arc::new(FileMessageLoader::new(fixture_path())))
        .with_missing_handler(handler);
    Translator::new().with_source("*", Arc::new(source))
}

#[tokio::test]
async fn test_same_language_returns_message() {
    let loader = Arc::new(CountingLoader::new(MemoryMessageLoader::new()));
    let translator =
        Translator::new().with_source("*", Arc::new(MessageSource::new(loader.clone())));

    let result = translator.translate("test", "The dog runs fast.", &Params::new(), "en-US").await;

    assert_eq!(result, "The dog runs fast.");
    assert_eq!(loader.loads(), 0);
}

#[tokio::test]
async fn test_direct_lookup_with_params() {
    let translator = file_translator(recording_handler());

    let result = translator
        .translate("test", "His speed is about {n} km/h.", &params(&[("n", "42")]), "ru")
        .await;

    assert_eq!(result, "Его скорость около 42 км/ч.");
}

#[tokio::test]
async fn test_bare_language_fallback() {
    // Only a ru catalog exists.
    let translator = file_translator(recording_handler());

    let result = translator.translate("test", "The dog runs fast.", &Params::new(), "ru-RU").await;

    assert_eq!(result, "Собака бегает быстро.");
}

#[tokio::test]
async fn test_fallback_chain_walks_to_bare_language() {
    let loader = MemoryMessageLoader::new()
        .with_messages("app", "sr-Latn", [("Save", "Sačuvaj")])
        .with_messages("app", "sr", [("Save", "Сачувај"), ("Cancel", "Откажи")]);
    let translator = Translator::new().with_source("app", Arc::new(MessageSource::new(Arc::new(loader))));

    let language = "sr-Latn-RS-REVISED@currency=RSD";
    assert_eq!(translator.translate("app", "Save", &Params::new(), language).await, "Sačuvaj");
    assert_eq!(translator.translate("app", "Cancel", &Params::new(), language).await, "Откажи");
}

#[tokio::test]
async fn test_source_language_dialect_fallback() {
    let translator = file_translator(recording_handler());

    let result = translator.translate("test", "The dog runs fast.", &Params::new(), "en-GB").await;

    assert_eq!(result, "The dog runs fast (en-US).");
}

#[tokio::test]
async fn test_total_miss_returns_source_text_and_notifies_once() {
    let handler = recording_handler();
    let translator = file_translator(handler.clone());

    for _ in 0..3 {
        let result = translator
            .translate("test", "Where is {who}?", &params(&[("who", "Rex")]), "de-DE")
            .await;
        assert_eq!(result, "Where is Rex?");
    }

    assert_eq!(
        handler.events(),
        [("test".to_string(), "Where is {who}?".to_string(), "de-DE".to_string())],
        "Exactly one event for the target language, none for fallback languages"
    );
}

#[tokio::test]
async fn test_missing_fallback_is_used_and_formatted() {
    let handler = Arc::new(RecordingHandler::default().with_fallback("Bye, {name}!", "Tschüss, {name}!"));
    let translator = file_translator(handler.clone());

    let result = translator.translate("test", "Bye, {name}!", &params(&[("name", "Anna")]), "de").await;

    assert_eq!(result, "Tschüss, Anna!");
    assert_eq!(handler.events().len(), 1);
}

#[tokio::test]
async fn test_category_routing() {
    let app = MemoryMessageLoader::new().with_messages("app/models", "de", [("Name", "Name (app)")]);
    let fallback = MemoryMessageLoader::new().with_messages("yii", "de", [("Name", "Name (yii)")]);
    let translator = Translator::new()
        .with_source("app*", Arc::new(MessageSource::new(Arc::new(app))))
        .with_source("*", Arc::new(MessageSource::new(Arc::new(fallback))));

    assert_eq!(translator.translate("app/models", "Name", &Params::new(), "de").await, "Name (app)");
    assert_eq!(translator.translate("yii", "Name", &Params::new(), "de").await, "Name (yii)");
}

struct Upper;

impl MessageFormatter for Upper {
    fn format(&self, message: &str, _params: &Params, language: &str) -> String {
        format!("{}:{}", language, message.to_uppercase())
    }
}

#[tokio::test]
async fn test_custom_formatter_gets_resolved_language() {
    let loader = MemoryMessageLoader::new().with_messages("app", "ru", [("Save", "Сохранить")]);
    let translator = Translator::new()
        .with_source("app", Arc::new(MessageSource::new(Arc::new(loader))))
        .with_formatter(Arc::new(Upper));

    assert_eq!(translator.translate("app", "Save", &Params::new(), "ru").await, "ru:СОХРАНИТЬ");
    // Source text is formatted with the source language.
    assert_eq!(translator.translate("app", "Cancel", &Params::new(), "ru").await, "en-US:CANCEL");
}

#[tokio::test]
async fn test_clear_cache() {
    let loader = Arc::new(CountingLoader::new(MemoryMessageLoader::new()));
    let translator = Translator::new().with_source("*", Arc::new(MessageSource::new(loader.clone())));

    translator.get_messages("test", "de").await.unwrap();
    translator.get_messages("test", "de").await.unwrap();
    translator.clear_cache();
    translator.get_messages("test", "de").await.unwrap();

    assert_eq!(loader.loads(), 2);
}

#[tokio::test]
async fn test_underscore_language_shares_canonical_catalogs() {
    let loader = Arc::new(CountingLoader::new(
        MemoryMessageLoader::new().with_messages("app", "de", [("Save", "Speichern")]),
    ));
    let handler = recording_handler();
    let source = MessageSource::new(loader.clone()).with_missing_handler(handler.clone());
    let translator = Translator::new().with_source("app", Arc::new(source));

    assert_eq!(translator.translate("app", "Save", &Params::new(), "de_AT").await, "Speichern");
    assert_eq!(translator.translate("app", "Save", &Params::new(), "de-AT").await, "Speichern");
    assert_eq!(translator.translate("app", "Open", &Params::new(), "de_at").await, "Open");

    // de-AT and de, nothing cached under the raw spelling
    assert_eq!(loader.loads(), 2);
    assert_eq!(handler.events(), [("app".to_string(), "Open".to_string(), "de-AT".to_string())]);
}

#[tokio::test]
async fn test_get_messages_canonicalizes_language() {
    let loader = Arc::new(CountingLoader::new(
        MemoryMessageLoader::new().with_messages("test", "de-DE", [("Hello", "Hallo")]),
    ));
    let translator = Translator::new().with_source("*", Arc::new(MessageSource::new(loader.clone())));

    for language in ["de-de", "de_DE", "DE-de", "de-DE"] {
        let catalog = translator.get_messages("test", language).await.unwrap();
        assert_eq!(catalog.translation("Hello").as_deref(), Some("Hallo"));
    }
    assert_eq!(loader.loads(), 1);

    let err = translator.get_messages("test", "_bad").await.unwrap_err();
    assert_eq!(err.error_code(), 1001);
}
