//! Document Store Adapter: index discovery and cursor-ordered batch fetch
//! against the classified-document search backend.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signalrouter_common::{Classify, RouterError};
use signalrouter_domains::Article;
use tracing::warn;

/// Opaque per-source resume token. Never interpreted outside this adapter —
/// every other component treats it as a value to round-trip, not to
/// inspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub published_at: DateTime<Utc>,
    pub id: String,
}

impl Cursor {
    /// "Beginning of time" — the cursor a newly observed source starts at.
    pub fn epoch() -> Self {
        Self {
            published_at: DateTime::<Utc>::MIN_UTC,
            id: String::new(),
        }
    }
}

pub struct FetchedBatch {
    pub articles: Vec<Article>,
    pub new_cursor: Cursor,
    pub done: bool,
}

/// The document-store boundary. Implementations must never modify stored
/// documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All index names matching `*_classified_content`. Idempotent.
    async fn discover_indexes(&self) -> Result<BTreeSet<String>, RouterError>;

    /// Up to `limit` articles strictly greater than `cursor` in
    /// `(published_at asc, id asc)` order, filtered to `content_type ==
    /// "article"`. Returns an empty, non-error, `done = true` batch when the
    /// index does not exist.
    async fn fetch_batch(
        &self,
        index: &str,
        cursor: &Cursor,
        limit: u32,
    ) -> Result<FetchedBatch, RouterError>;
}

/// Production adapter speaking to an HTTP search backend. The document
/// store is an external collaborator; its exact query engine is opaque to
/// this adapter.
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IndexListResponse {
    indexes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    filter: SearchFilter<'a>,
    sort: [&'static str; 2],
    search_after: [serde_json::Value; 2],
    size: u32,
}

#[derive(Debug, Serialize)]
struct SearchFilter<'a> {
    content_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    articles: Vec<Article>,
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn discover_indexes(&self) -> Result<BTreeSet<String>, RouterError> {
        let resp = self
            .client
            .get(format!("{}/_indexes", self.base_url))
            .query(&[("glob", "*_classified_content")])
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED
            || resp.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RouterError::Permanent(format!(
                "document store auth denied: {}",
                resp.status()
            )));
        }
        if !resp.status().is_success() {
            return Err(RouterError::Transient(format!(
                "document store returned {}",
                resp.status()
            )));
        }

        let body: IndexListResponse = resp.json().await.map_err(classify_reqwest_error)?;
        Ok(body.indexes.into_iter().collect())
    }

    async fn fetch_batch(
        &self,
        index: &str,
        cursor: &Cursor,
        limit: u32,
    ) -> Result<FetchedBatch, RouterError> {
        let request = SearchRequest {
            filter: SearchFilter {
                content_type: "article",
            },
            sort: ["published_at", "_id"],
            search_after: [
                serde_json::Value::String(cursor.published_at.to_rfc3339()),
                serde_json::Value::String(cursor.id.clone()),
            ],
            size: limit,
        };

        let resp = self
            .client
            .post(format!("{}/{}/_search", self.base_url, index))
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(FetchedBatch {
                articles: Vec::new(),
                new_cursor: cursor.clone(),
                done: true,
            });
        }
        if !resp.status().is_success() {
            return Err(RouterError::Transient(format!(
                "document store search on {index} returned {}",
                resp.status()
            )));
        }

        let body: SearchResponse = resp.json().await.map_err(classify_reqwest_error)?;
        let done = (body.articles.len() as u32) < limit;
        let new_cursor = body
            .articles
            .last()
            .map(|a| Cursor {
                published_at: a.published_at,
                id: a.id.clone(),
            })
            .unwrap_or_else(|| cursor.clone());

        Ok(FetchedBatch {
            articles: body.articles,
            new_cursor,
            done,
        })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> RouterError {
    if err.is_timeout() || err.is_connect() {
        RouterError::Transient(err.to_string())
    } else if err.is_decode() {
        warn!(error = %err, "document store returned a body that did not match the expected schema");
        RouterError::Permanent(err.to_string())
    } else {
        RouterError::Transient(err.to_string())
    }
}

impl Classify for reqwest::Error {
    fn classify(self) -> RouterError {
        classify_reqwest_error(self)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory document store for orchestrator tests. Each index holds its
    /// articles pre-sorted by `(published_at, id)`.
    #[derive(Default)]
    pub struct FakeDocumentStore {
        indexes: Mutex<HashMap<String, Vec<Article>>>,
        discover_error: Mutex<Option<RouterError>>,
    }

    impl FakeDocumentStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, index: &str, mut articles: Vec<Article>) {
            articles.sort_by(|a, b| (a.published_at, &a.id).cmp(&(b.published_at, &b.id)));
            self.indexes
                .lock()
                .unwrap()
                .insert(index.to_string(), articles);
        }

        pub fn remove_index(&self, index: &str) {
            self.indexes.lock().unwrap().remove(index);
        }

        pub fn fail_discovery_once(&self, err: RouterError) {
            *self.discover_error.lock().unwrap() = Some(err);
        }
    }

    #[async_trait]
    impl DocumentStore for FakeDocumentStore {
        async fn discover_indexes(&self) -> Result<BTreeSet<String>, RouterError> {
            if let Some(err) = self.discover_error.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self.indexes.lock().unwrap().keys().cloned().collect())
        }

        async fn fetch_batch(
            &self,
            index: &str,
            cursor: &Cursor,
            limit: u32,
        ) -> Result<FetchedBatch, RouterError> {
            let indexes = self.indexes.lock().unwrap();
            let Some(all) = indexes.get(index) else {
                return Ok(FetchedBatch {
                    articles: Vec::new(),
                    new_cursor: cursor.clone(),
                    done: true,
                });
            };

            let matching: Vec<Article> = all
                .iter()
                .filter(|a| {
                    (a.published_at, a.id.as_str()) > (cursor.published_at, cursor.id.as_str())
                })
                .filter(|a| a.is_routable_content_type())
                .take(limit as usize)
                .cloned()
                .collect();

            let done = matching.len() < limit as usize;
            let new_cursor = matching
                .last()
                .map(|a| Cursor {
                    published_at: a.published_at,
                    id: a.id.clone(),
                })
                .unwrap_or_else(|| cursor.clone());

            Ok(FetchedBatch {
                articles: matching,
                new_cursor,
                done,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeDocumentStore;
    use super::*;
    use chrono::Duration;

    fn article(id: &str, published_at: DateTime<Utc>) -> Article {
        Article {
            id: id.to_string(),
            title: "t".into(),
            body: "b".into(),
            url: format!("https://example.com/{id}"),
            source_name: "src".into(),
            published_at,
            quality_score: 80,
            topics: Default::default(),
            content_type: "article".into(),
            crime: None,
            mining: None,
            entertainment: None,
            anishinaabe: None,
            coforge: None,
            location: None,
        }
    }

    #[tokio::test]
    async fn fetch_batch_respects_cursor_strict_greater_than() {
        let store = FakeDocumentStore::new();
        let t0 = Utc::now();
        store.seed(
            "siteA_classified_content",
            vec![
                article("a1", t0),
                article("a2", t0 + Duration::seconds(1)),
                article("a3", t0 + Duration::seconds(2)),
            ],
        );

        let cursor = Cursor {
            published_at: t0,
            id: "a1".into(),
        };
        let batch = store
            .fetch_batch("siteA_classified_content", &cursor, 10)
            .await
            .unwrap();

        assert_eq!(batch.articles.len(), 2);
        assert_eq!(batch.articles[0].id, "a2");
        assert_eq!(batch.articles[1].id, "a3");
        assert!(batch.done);
        assert_eq!(batch.new_cursor.id, "a3");
    }

    #[tokio::test]
    async fn missing_index_returns_empty_done_batch() {
        let store = FakeDocumentStore::new();
        let cursor = Cursor::epoch();
        let batch = store
            .fetch_batch("does_not_exist_classified_content", &cursor, 10)
            .await
            .unwrap();
        assert!(batch.articles.is_empty());
        assert!(batch.done);
    }

    #[tokio::test]
    async fn disappearing_index_resumes_from_cursor_on_reappearance() {
        let store = FakeDocumentStore::new();
        let t0 = Utc::now();
        store.seed("siteA_classified_content", vec![article("a1", t0)]);

        let cursor = Cursor {
            published_at: t0,
            id: "a1".into(),
        };

        store.remove_index("siteA_classified_content");
        let during_outage = store
            .fetch_batch("siteA_classified_content", &cursor, 10)
            .await
            .unwrap();
        assert!(during_outage.articles.is_empty());

        store.seed(
            "siteA_classified_content",
            vec![article("a1", t0), article("a2", t0 + Duration::seconds(1))],
        );
        let after_return = store
            .fetch_batch("siteA_classified_content", &cursor, 10)
            .await
            .unwrap();
        assert_eq!(after_return.articles.len(), 1);
        assert_eq!(after_return.articles[0].id, "a2");
    }
}
