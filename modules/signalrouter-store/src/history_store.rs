//! History / Cursor Store: dedup bookkeeping, durable cursors, and the
//! channel registry's backing table. Postgres via sqlx, following the
//! repository pattern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signalrouter_common::{Classify, RouterError};
use signalrouter_domains::{CustomChannel, Source};
use sqlx::PgPool;

use crate::document_store::Cursor;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// True iff a history record exists for the pair. Must be strongly
    /// consistent with recent writes from this process.
    async fn has_published(&self, article_id: &str, channel_name: &str) -> Result<bool, RouterError>;

    /// Persists a history record. Returns `Err(RouterError::AlreadyExists)`
    /// if the pair was recorded concurrently.
    async fn record_publish(
        &self,
        article_id: &str,
        channel_name: &str,
        channel_id: Option<&str>,
        route_id: Option<&str>,
        published_at: DateTime<Utc>,
    ) -> Result<(), RouterError>;

    async fn load_custom_channels(&self) -> Result<Vec<CustomChannel>, RouterError>;

    /// All enabled `Source` rows, unioned with discovered indexes to obtain
    /// the active source set.
    async fn load_enabled_sources(&self) -> Result<Vec<Source>, RouterError>;

    async fn load_cursor(&self, source_key: &str) -> Result<Option<Cursor>, RouterError>;

    /// Atomic with respect to reads.
    async fn save_cursor(&self, source_key: &str, cursor: &Cursor) -> Result<(), RouterError>;
}

#[derive(Clone)]
pub struct PostgresHistoryStore {
    pool: PgPool,
}

impl PostgresHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), RouterError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RouterError::Fatal(format!("history store migration failed: {e}")))
    }
}

#[derive(sqlx::FromRow)]
struct CustomChannelRow {
    id: uuid::Uuid,
    topic_name: String,
    enabled: bool,
    include_topics: Vec<String>,
    exclude_topics: Vec<String>,
    min_quality: i32,
    content_types: Vec<String>,
}

impl From<CustomChannelRow> for CustomChannel {
    fn from(row: CustomChannelRow) -> Self {
        CustomChannel {
            id: row.id.to_string(),
            topic_name: row.topic_name,
            enabled: row.enabled,
            include_topics: row.include_topics.into_iter().collect(),
            exclude_topics: row.exclude_topics.into_iter().collect(),
            min_quality: row.min_quality,
            content_types: row.content_types.into_iter().collect(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CursorRow {
    published_at: DateTime<Utc>,
    article_id: String,
}

#[derive(sqlx::FromRow)]
struct SourceRow {
    index_pattern: String,
    enabled: bool,
    name: String,
}

impl From<SourceRow> for Source {
    fn from(row: SourceRow) -> Self {
        Source {
            index_pattern: row.index_pattern,
            enabled: row.enabled,
            name: row.name,
        }
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    async fn has_published(&self, article_id: &str, channel_name: &str) -> Result<bool, RouterError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM publish_history
                WHERE article_id = $1 AND channel_name = $2
            )
            "#,
        )
        .bind(article_id)
        .bind(channel_name)
        .fetch_one(&self.pool)
        .await
        .map_err(Classify::classify)?;

        Ok(exists)
    }

    async fn record_publish(
        &self,
        article_id: &str,
        channel_name: &str,
        channel_id: Option<&str>,
        route_id: Option<&str>,
        published_at: DateTime<Utc>,
    ) -> Result<(), RouterError> {
        let channel_uuid = channel_id
            .map(|s| uuid::Uuid::parse_str(s))
            .transpose()
            .map_err(|e| RouterError::Permanent(format!("invalid channel_id: {e}")))?;
        let route_uuid = route_id
            .map(|s| uuid::Uuid::parse_str(s))
            .transpose()
            .map_err(|e| RouterError::Permanent(format!("invalid route_id: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO publish_history (article_id, channel_name, channel_id, route_id, published_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(article_id)
        .bind(channel_name)
        .bind(channel_uuid)
        .bind(route_uuid)
        .bind(published_at)
        .execute(&self.pool)
        .await
        .map_err(Classify::classify)?;

        Ok(())
    }

    async fn load_custom_channels(&self) -> Result<Vec<CustomChannel>, RouterError> {
        let rows = sqlx::query_as::<_, CustomChannelRow>(
            r#"
            SELECT id, topic_name, enabled, include_topics, exclude_topics, min_quality, content_types
            FROM custom_channels
            WHERE enabled = true
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Classify::classify)?;

        Ok(rows.into_iter().map(CustomChannel::from).collect())
    }

    async fn load_enabled_sources(&self) -> Result<Vec<Source>, RouterError> {
        let rows = sqlx::query_as::<_, SourceRow>(
            r#"
            SELECT index_pattern, enabled, name FROM sources WHERE enabled = true
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Classify::classify)?;

        Ok(rows.into_iter().map(Source::from).collect())
    }

    async fn load_cursor(&self, source_key: &str) -> Result<Option<Cursor>, RouterError> {
        let row = sqlx::query_as::<_, CursorRow>(
            r#"
            SELECT published_at, article_id FROM source_cursors WHERE source_key = $1
            "#,
        )
        .bind(source_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(Classify::classify)?;

        Ok(row.map(|r| Cursor {
            published_at: r.published_at,
            id: r.article_id,
        }))
    }

    async fn save_cursor(&self, source_key: &str, cursor: &Cursor) -> Result<(), RouterError> {
        sqlx::query(
            r#"
            INSERT INTO source_cursors (source_key, published_at, article_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (source_key)
            DO UPDATE SET published_at = EXCLUDED.published_at, article_id = EXCLUDED.article_id
            "#,
        )
        .bind(source_key)
        .bind(cursor.published_at)
        .bind(&cursor.id)
        .execute(&self.pool)
        .await
        .map_err(Classify::classify)?;

        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory history/cursor store. `fail_record_once` lets orchestrator
    /// tests reproduce a replay after a history-write failure without a
    /// real database.
    #[derive(Default)]
    pub struct FakeHistoryStore {
        published: Mutex<HashSet<(String, String)>>,
        cursors: Mutex<HashMap<String, Cursor>>,
        channels: Mutex<Vec<CustomChannel>>,
        sources: Mutex<Vec<Source>>,
        fail_record_once: Mutex<HashSet<(String, String)>>,
    }

    impl FakeHistoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_channels(&self, channels: Vec<CustomChannel>) {
            *self.channels.lock().unwrap() = channels;
        }

        pub fn set_sources(&self, sources: Vec<Source>) {
            *self.sources.lock().unwrap() = sources;
        }

        /// The next `record_publish` for this `(article_id, channel_name)`
        /// pair returns `Transient` instead of succeeding, without marking
        /// the pair as published.
        pub fn fail_record_once(&self, article_id: &str, channel_name: &str) {
            self.fail_record_once
                .lock()
                .unwrap()
                .insert((article_id.to_string(), channel_name.to_string()));
        }

        pub fn published_pairs(&self) -> Vec<(String, String)> {
            self.published.lock().unwrap().iter().cloned().collect()
        }
    }

    #[async_trait]
    impl HistoryStore for FakeHistoryStore {
        async fn has_published(&self, article_id: &str, channel_name: &str) -> Result<bool, RouterError> {
            Ok(self
                .published
                .lock()
                .unwrap()
                .contains(&(article_id.to_string(), channel_name.to_string())))
        }

        async fn record_publish(
            &self,
            article_id: &str,
            channel_name: &str,
            _channel_id: Option<&str>,
            _route_id: Option<&str>,
            _published_at: DateTime<Utc>,
        ) -> Result<(), RouterError> {
            let key = (article_id.to_string(), channel_name.to_string());

            if self.fail_record_once.lock().unwrap().remove(&key) {
                return Err(RouterError::Transient("simulated history write failure".into()));
            }

            let mut published = self.published.lock().unwrap();
            if !published.insert(key) {
                return Err(RouterError::AlreadyExists);
            }
            Ok(())
        }

        async fn load_custom_channels(&self) -> Result<Vec<CustomChannel>, RouterError> {
            Ok(self.channels.lock().unwrap().clone())
        }

        async fn load_enabled_sources(&self) -> Result<Vec<Source>, RouterError> {
            Ok(self.sources.lock().unwrap().clone())
        }

        async fn load_cursor(&self, source_key: &str) -> Result<Option<Cursor>, RouterError> {
            Ok(self.cursors.lock().unwrap().get(source_key).cloned())
        }

        async fn save_cursor(&self, source_key: &str, cursor: &Cursor) -> Result<(), RouterError> {
            self.cursors
                .lock()
                .unwrap()
                .insert(source_key.to_string(), cursor.clone());
            Ok(())
        }
    }
}
