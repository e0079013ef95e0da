use crate::services::formatter::Params;
use crate::services::message_source::{FileMessageLoader, MessageLoader, MessageSource};
use crate::services::translator::Translator;
use crate::tests::common::fixture_path;
use std::collections::HashMap;
use std::sync::Arc;

fn loader() -> FileMessageLoader {
    FileMessageLoader::new(fixture_path())
        .with_file_map(HashMap::from([("app/error".to_string(), "errors.toml".to_string())]))
}

#[tokio::test]
async fn test_load_exact() {
    let loader = loader();

    let messages = loader.load_exact("test", "ru").await.unwrap().unwrap();
    assert_eq!(messages.get("The dog runs fast.").map(String::as_str), Some("Собака бегает быстро."));

    let missing = loader.load_exact("test", "fr").await.unwrap();
    assert!(missing.is_none(), "A missing file is not an error");
}

#[tokio::test]
async fn test_specific_language_merges_bare_language() {
    let messages = loader().load_messages("test", "de-DE", "en-US").await.unwrap();

    // de-DE wins where it has a translation
    assert_eq!(messages.get("The dog runs fast.").map(String::as_str), Some("Der Hund rennt schnell."));
    // empty in de-DE, filled from de
    assert_eq!(messages.get("Hello world!").map(String::as_str), Some("Hallo Welt!"));
    // only in de
    assert_eq!(messages.get("The cat sleeps.").map(String::as_str), Some("Die Katze schläft."));
}

#[tokio::test]
async fn test_bare_source_language_merges_source_language() {
    let messages = loader().load_messages("test", "en", "en-US").await.unwrap();
    assert_eq!(
        messages.get("The dog runs fast.").map(String::as_str),
        Some("The dog runs fast (en-US).")
    );
}

#[tokio::test]
async fn test_missing_files_give_empty_catalog() {
    let messages = loader().load_messages("test", "fr-FR", "en-US").await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_file_map_and_nested_categories() {
    let loader = loader();

    let errors = loader.load_messages("app/error", "de-DE", "en-US").await.unwrap();
    assert_eq!(errors.get("Page not found.").map(String::as_str), Some("Seite nicht gefunden."));

    let models = loader.load_messages("app\\models", "de-DE", "en-US").await.unwrap();
    assert_eq!(models.get("Name").map(String::as_str), Some("Name (Modell)"));
}

#[tokio::test]
async fn test_message_source_over_files() {
    let source = MessageSource::new(Arc::new(loader()));

    assert_eq!(
        source.translate("test", "His speed is about {n} km/h.", "ru-RU").await.as_deref(),
        Some("Его скорость около {n} км/ч.")
    );
    assert_eq!(source.translate("test", "Hello world!", "de-DE").await.as_deref(), Some("Hallo Welt!"));
    assert_eq!(source.translate("test", "Unknown", "de-DE").await, None);
}

#[tokio::test]
async fn test_category_cannot_escape_base_path() {
    let root = std::env::temp_dir().join(format!("langtag-i18n-escape-{}", std::process::id()));
    let base = root.join("messages");
    tokio::fs::create_dir_all(base.join("de/app")).await.unwrap();
    tokio::fs::write(root.join("secret.json"), r#"{"db_password": "hunter2"}"#).await.unwrap();

    let source = MessageSource::new(Arc::new(FileMessageLoader::new(base.clone())));
    let translator = Translator::new().with_source("app*", Arc::new(source));

    let result = translator
        .translate("app/../../../secret", "db_password", &Params::new(), "de")
        .await;
    assert_eq!(result, "db_password");

    let err = translator.get_messages("app/../../../secret", "de").await.unwrap_err();
    assert_eq!(err.error_code(), 4002);

    tokio::fs::remove_dir_all(&root).await.unwrap();
}
