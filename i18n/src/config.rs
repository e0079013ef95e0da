use crate::locale::LocaleTag;
use crate::services::message_source::DEFAULT_SOURCE_LANGUAGE;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Locale used when a request names none
    pub default_language: String,
    pub sources: Vec<SourceConfig>,
}

/// One `[[translator.sources]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Exact category, `prefix*` or `*`
    pub pattern: String,
    pub source_language: String,
    pub force_translation: bool,
    /// Seconds catalogs stay cached, 0 = forever (accepts "30s", "5m", "1h")
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub caching_duration: u64,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    File {
        base_path: String,
        #[serde(default)]
        file_map: HashMap<String, String>,
    },
    Db {
        #[serde(default = "default_source_message_table")]
        source_message_table: String,
        #[serde(default = "default_message_table")]
        message_table: String,
    },
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from `path`, or the first config.toml found
    /// 2. Override with environment variables (prefixed with APP_)
    /// 3. Validate the final configuration
    pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
        // 1. Load from config file
        let mut config = match path.map(str::to_string).or_else(Self::find_config_file) {
            Some(config_path) => Self::from_toml(&config_path)?,
            None => {
                tracing::warn!("Configuration file not found, using defaults");
                Config::default()
            }
        };

        // 2. Override with environment variables
        config.apply_env_overrides();

        // 3. Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8080)
    /// - APP_DATABASE_URL: Database URL (default: sqlite://data/i18n.db)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,langtag_i18n=debug")
    /// - APP_DEFAULT_LANGUAGE: Locale used when a request names none
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("APP_SERVER_HOST") {
            self.server.host = host;
            tracing::info!("Override server.host from env: {}", self.server.host);
        }

        if let Ok(port) = std::env::var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            tracing::info!("Override server.port from env: {}", self.server.port);
        }

        if let Ok(db_url) = std::env::var("APP_DATABASE_URL") {
            self.database.url = db_url;
            tracing::info!("Override database.url from env");
        }

        if let Ok(level) = std::env::var("APP_LOG_LEVEL") {
            self.logging.level = level;
            tracing::info!("Override logging.level from env: {}", self.logging.level);
        }

        if let Ok(language) = std::env::var("APP_DEFAULT_LANGUAGE") {
            self.translator.default_language = language;
            tracing::info!(
                "Override translator.default_language from env: {}",
                self.translator.default_language
            );
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        // Validate server port
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        LocaleTag::try_from(self.translator.default_language.as_str())
            .map_err(|e| anyhow::anyhow!("translator.default_language: {}", e))?;

        for source in &self.translator.sources {
            if source.pattern.is_empty() {
                anyhow::bail!("translator.sources.pattern cannot be empty");
            }
            LocaleTag::try_from(source.source_language.as_str())
                .map_err(|e| anyhow::anyhow!("source '{}': {}", source.pattern, e))?;

            match &source.backend {
                BackendConfig::File { base_path, .. } if base_path.is_empty() => {
                    anyhow::bail!("source '{}': base_path cannot be empty", source.pattern);
                }
                BackendConfig::Db { .. } if self.database.url.is_empty() => {
                    anyhow::bail!("source '{}' uses the db backend but database.url is empty", source.pattern);
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Whether any source reads from the database
    pub fn uses_database(&self) -> bool {
        self.translator
            .sources
            .iter()
            .any(|source| matches!(source.backend, BackendConfig::Db { .. }))
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: "sqlite://data/i18n.db".to_string() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,langtag_i18n=debug".to_string(), file: None }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            sources: vec![SourceConfig::default()],
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            pattern: "*".to_string(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            force_translation: false,
            caching_duration: 0,
            backend: BackendConfig::default(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::File { base_path: "messages".to_string(), file_map: HashMap::new() }
    }
}

fn default_source_message_table() -> String {
    crate::services::message_source::DEFAULT_SOURCE_MESSAGE_TABLE.to_string()
}

fn default_message_table() -> String {
    crate::services::message_source::DEFAULT_MESSAGE_TABLE.to_string()
}

// =========================
// Helpers for parsing values
// =========================

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    let multiplier: u64 = match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hour" | "hours" => 60 * 60,
        "d" | "day" | "days" => 60 * 60 * 24,
        _ => return Err(format!("unsupported unit: {}", unit)),
    };
    n.checked_mul(multiplier).ok_or_else(|| format!("duration too large: {}", input))
}

// Accepts a number of seconds or a human-friendly string
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '5m', '1h'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_to_secs() {
        assert_eq!(parse_duration_to_secs("0"), Ok(0));
        assert_eq!(parse_duration_to_secs("30s"), Ok(30));
        assert_eq!(parse_duration_to_secs("5m"), Ok(300));
        assert_eq!(parse_duration_to_secs("1h"), Ok(3600));
        assert!(parse_duration_to_secs("5 parsecs").is_err());
        assert!(parse_duration_to_secs("m").is_err());
        assert_eq!(parse_duration_to_secs("2d"), Ok(172_800));
        assert!(parse_duration_to_secs("18446744073709551615d").is_err());
        assert!(parse_duration_to_secs("307445734561825861m").is_err());
    }

    #[test]
    fn test_parse_translator_sources() {
        let config: Config = toml::from_str(
            r#"
            [translator]
            default_language = "de-DE"

            [[translator.sources]]
            pattern = "app*"
            source_language = "en"
            caching_duration = "5m"
            backend = { type = "file", base_path = "messages", file_map = { "app/error" = "error.toml" } }

            [[translator.sources]]
            pattern = "*"
            force_translation = true
            caching_duration = 60
            backend = { type = "db" }
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert!(config.uses_database());
        assert_eq!(config.translator.default_language, "de-DE");

        let app = &config.translator.sources[0];
        assert_eq!(app.caching_duration, 300);
        assert_eq!(app.source_language, "en");
        assert!(
            matches!(&app.backend, BackendConfig::File { file_map, .. } if file_map["app/error"] == "error.toml")
        );

        let wildcard = &config.translator.sources[1];
        assert!(wildcard.force_translation);
        assert_eq!(wildcard.source_language, DEFAULT_SOURCE_LANGUAGE);
        assert_eq!(
            wildcard.backend,
            BackendConfig::Db {
                source_message_table: "source_message".to_string(),
                message_table: "message".to_string(),
            }
        );
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.uses_database());

        config.translator.default_language = "_invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.translator.sources[0].backend = BackendConfig::Db {
            source_message_table: "source_message".to_string(),
            message_table: "message".to_string(),
        };
        config.database.url.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }
}
