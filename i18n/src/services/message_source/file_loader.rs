use super::MessageLoader;
use crate::services::catalog_cache::Messages;
use crate::utils::{I18nError, I18nResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFileFormat {
    Json,
    Toml,
}

impl MessageFileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Format implied by a file extension, `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn parse(self, content: &str, path: &Path) -> I18nResult<Messages> {
        let display = path.display().to_string();
        match self {
            Self::Json => serde_json::from_str(content)
                .map_err(|e| I18nError::catalog_format(display, e)),
            Self::Toml => toml::from_str(content).map_err(|e| I18nError::catalog_format(display, e)),
        }
    }
}

/// Loads messages from `<base_path>/<language>/<category>.<ext>` files.
///
/// Each file holds a flat map from source message to translation. The file
/// for a category can be overridden through the file map; backslashes in
/// the category become path separators.
#[derive(Debug, Clone)]
pub struct FileMessageLoader {
    base_path: PathBuf,
    format: MessageFileFormat,
    file_map: HashMap<String, String>,
}

impl FileMessageLoader {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            format: MessageFileFormat::Json,
            file_map: HashMap::new(),
        }
    }

    /// Format assumed for files whose extension is not recognised
    pub fn with_format(mut self, format: MessageFileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_file_map(mut self, file_map: HashMap<String, String>) -> Self {
        self.file_map = file_map;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the message file for `category` in `language`.
    ///
    /// The path below `base_path` may only contain plain components, so
    /// categories such as `../secret` or `/etc/app` are rejected.
    pub fn message_file_path(&self, category: &str, language: &str) -> I18nResult<PathBuf> {
        let file = match self.file_map.get(category) {
            Some(file) => file.clone(),
            None => format!("{}.{}", category.replace('\\', "/"), self.format.extension()),
        };
        let relative = Path::new(language).join(file);
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return Err(I18nError::invalid_input(format!(
                "Invalid message category '{category}' for language '{language}'"
            )));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl MessageLoader for FileMessageLoader {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load_exact(&self, category: &str, language: &str) -> I18nResult<Option<Messages>> {
        let path = self.message_file_path(category, language)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Message file not found: {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(I18nError::catalog_load(category, language, e)),
        };

        let format = MessageFileFormat::from_path(&path).unwrap_or(self.format);
        format.parse(&content, &path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_file_path() {
        let loader = FileMessageLoader::new("/srv/messages").with_file_map(HashMap::from([(
            "app/error".to_string(),
            "errors.toml".to_string(),
        )]));

        assert_eq!(
            loader.message_file_path("test", "de-DE").unwrap(),
            PathBuf::from("/srv/messages/de-DE/test.json")
        );
        assert_eq!(
            loader.message_file_path("app\\models", "ru").unwrap(),
            PathBuf::from("/srv/messages/ru/app/models.json")
        );
        assert_eq!(
            loader.message_file_path("app/error", "ru").unwrap(),
            PathBuf::from("/srv/messages/ru/errors.toml")
        );
    }

    #[test]
    fn test_message_file_path_rejects_escaping_categories() {
        let loader = FileMessageLoader::new("/srv/messages");

        for category in ["app/../../../secret", "../secret", "/etc/app", "app\\..\\..\\secret"] {
            let err = loader.message_file_path(category, "de").unwrap_err();
            assert_eq!(err.error_code(), 4002, "category {category:?} must be rejected");
        }
        assert_eq!(loader.message_file_path("test", "../de").unwrap_err().error_code(), 4002);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(MessageFileFormat::from_path(Path::new("a/b.TOML")), Some(MessageFileFormat::Toml));
        assert_eq!(MessageFileFormat::from_path(Path::new("a/b.json")), Some(MessageFileFormat::Json));
        assert_eq!(MessageFileFormat::from_path(Path::new("a/b.php")), None);
    }

    #[test]
    fn test_parse_toml() {
        let messages = MessageFileFormat::Toml
            .parse("\"Hello world!\" = \"Hallo Welt!\"\n", Path::new("x.toml"))
            .unwrap();
        assert_eq!(messages.get("Hello world!").map(String::as_str), Some("Hallo Welt!"));

        let err = MessageFileFormat::Json.parse("{not json", Path::new("x.json")).unwrap_err();
        assert_eq!(err.error_code(), 2002);
    }
}
