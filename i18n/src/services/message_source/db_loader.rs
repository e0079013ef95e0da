use super::{MessageLoader, fallback_language};
use crate::services::catalog_cache::Messages;
use crate::utils::{I18nError, I18nResult};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::{FromRow, SqlitePool};

pub const DEFAULT_SOURCE_MESSAGE_TABLE: &str = "source_message";
pub const DEFAULT_MESSAGE_TABLE: &str = "message";

static TABLE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid table name pattern"));

#[derive(Debug, FromRow)]
struct MessageRow {
    message: String,
    translation: Option<String>,
}

/// Loads messages from a `source_message` / `message` table pair.
///
/// ```text
/// source_message(id, category, message)
/// message(id -> source_message.id, language, translation)
/// ```
#[derive(Debug, Clone)]
pub struct DbMessageLoader {
    pool: SqlitePool,
    source_message_table: String,
    message_table: String,
}

impl DbMessageLoader {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            source_message_table: DEFAULT_SOURCE_MESSAGE_TABLE.to_string(),
            message_table: DEFAULT_MESSAGE_TABLE.to_string(),
        }
    }

    /// Use custom table names; they are interpolated into SQL and must be
    /// plain identifiers.
    pub fn with_tables(
        mut self,
        source_message_table: impl Into<String>,
        message_table: impl Into<String>,
    ) -> I18nResult<Self> {
        let source_message_table = source_message_table.into();
        let message_table = message_table.into();
        for table in [&source_message_table, &message_table] {
            if !TABLE_NAME.is_match(table) {
                return Err(I18nError::invalid_config(format!("Invalid table name '{table}'")));
            }
        }
        self.source_message_table = source_message_table;
        self.message_table = message_table;
        Ok(self)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the default message tables.
    pub async fn migrate(&self) -> I18nResult<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    /// Stores `translation` of `message`, creating the source row if needed.
    pub async fn add_translation(
        &self,
        category: &str,
        message: &str,
        language: &str,
        translation: &str,
    ) -> I18nResult<i64> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as(&format!(
            "SELECT id FROM {} WHERE category = ? AND message = ?",
            self.source_message_table
        ))
        .bind(category)
        .bind(message)
        .fetch_optional(&mut *tx)
        .await?;

        let id = match existing {
            Some((id,)) => id,
            None => sqlx::query(&format!(
                "INSERT INTO {} (category, message) VALUES (?, ?)",
                self.source_message_table
            ))
            .bind(category)
            .bind(message)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid(),
        };

        sqlx::query(&format!(
            "INSERT INTO {} (id, language, translation) VALUES (?, ?, ?) \
             ON CONFLICT(id, language) DO UPDATE SET translation = excluded.translation",
            self.message_table
        ))
        .bind(id)
        .bind(language)
        .bind(translation)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT t1.message AS message, t2.translation AS translation \
             FROM {source} t1 JOIN {message} t2 ON t1.id = t2.id \
             WHERE t1.category = ? AND t2.language = ?",
            source = self.source_message_table,
            message = self.message_table,
        )
    }

    fn fallback_sql(&self) -> String {
        format!(
            "{select} AND t2.id NOT IN (SELECT id FROM {message} WHERE language = ?)",
            select = self.select_sql(),
            message = self.message_table,
        )
    }

    async fn fetch(&self, category: &str, language: &str, fallback: Option<&str>) -> I18nResult<Vec<MessageRow>> {
        let rows = match fallback {
            None => {
                sqlx::query_as::<_, MessageRow>(&self.select_sql())
                    .bind(category)
                    .bind(language)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(fallback) => {
                let sql = format!("{} UNION ALL {}", self.select_sql(), self.fallback_sql());
                sqlx::query_as::<_, MessageRow>(&sql)
                    .bind(category)
                    .bind(language)
                    .bind(category)
                    .bind(fallback)
                    .bind(language)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }
}

fn into_messages(rows: Vec<MessageRow>) -> Messages {
    rows.into_iter()
        .map(|row| (row.message, row.translation.unwrap_or_default()))
        .collect()
}

#[async_trait]
impl MessageLoader for DbMessageLoader {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn load_exact(&self, category: &str, language: &str) -> I18nResult<Option<Messages>> {
        let rows = self.fetch(category, language, None).await?;
        Ok((!rows.is_empty()).then(|| into_messages(rows)))
    }

    /// Single query: rows stored for `language` plus rows of the fallback
    /// language for messages that have no row in `language` at all.
    async fn load_messages(
        &self,
        category: &str,
        language: &str,
        source_language: &str,
    ) -> I18nResult<Messages> {
        let fallback = fallback_language(language, source_language);
        let rows = self.fetch(category, language, fallback.as_deref()).await?;
        tracing::debug!(
            "[db] Loaded {} rows for {}/{} (fallback: {:?})",
            rows.len(),
            language,
            category,
            fallback
        );
        Ok(into_messages(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_tables_rejects_injection() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let loader = DbMessageLoader::new(pool);

        let err = loader
            .clone()
            .with_tables("source_message; DROP TABLE message", "message")
            .unwrap_err();
        assert_eq!(err.error_code(), 4001);

        let loader = loader.with_tables("app_source_message", "app_message").unwrap();
        assert!(loader.select_sql().contains("FROM app_source_message t1 JOIN app_message t2"));
    }
}
