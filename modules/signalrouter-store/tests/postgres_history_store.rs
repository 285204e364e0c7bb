//! Exercises `PostgresHistoryStore` against a real Postgres instance.
//!
//! Gated behind `postgres-tests` since it needs `DATABASE_URL` pointed at a
//! real (throwaway) database — unlike the `FakeHistoryStore`-backed unit
//! tests, it is the only place that actually proves the unique constraint
//! on `(article_id, channel_name)` surfaces as `RouterError::AlreadyExists`
//! rather than some other `sqlx::Error` variant.
#![cfg(feature = "postgres-tests")]

use chrono::Utc;
use signalrouter_common::RouterError;
use signalrouter_store::history_store::PostgresHistoryStore;
use signalrouter_store::HistoryStore;
use sqlx::postgres::PgPoolOptions;

async fn connect() -> PostgresHistoryStore {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a throwaway Postgres instance");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&database_url)
        .await
        .expect("failed to connect to test database");
    let store = PostgresHistoryStore::new(pool);
    store.migrate().await.expect("migrations failed");
    store
}

#[tokio::test]
async fn duplicate_record_publish_surfaces_as_already_exists() {
    let store = connect().await;
    let article_id = format!("pg-test-{}", uuid::Uuid::new_v4());

    store
        .record_publish(&article_id, "articles:news", None, None, Utc::now())
        .await
        .expect("first record_publish should succeed");

    let second = store
        .record_publish(&article_id, "articles:news", None, None, Utc::now())
        .await;
    assert!(matches!(second, Err(RouterError::AlreadyExists)));
}

#[tokio::test]
async fn has_published_is_strongly_consistent_with_a_prior_write() {
    let store = connect().await;
    let article_id = format!("pg-test-{}", uuid::Uuid::new_v4());

    assert!(!store.has_published(&article_id, "articles:news").await.unwrap());

    store
        .record_publish(&article_id, "articles:news", None, None, Utc::now())
        .await
        .unwrap();

    assert!(store.has_published(&article_id, "articles:news").await.unwrap());
}

#[tokio::test]
async fn save_cursor_upserts_and_load_cursor_reads_back_the_latest() {
    let store = connect().await;
    let source_key = format!("pg-test-source-{}", uuid::Uuid::new_v4());

    let first = signalrouter_store::Cursor {
        published_at: Utc::now(),
        id: "a1".to_string(),
    };
    store.save_cursor(&source_key, &first).await.unwrap();
    assert_eq!(store.load_cursor(&source_key).await.unwrap(), Some(first));

    let second = signalrouter_store::Cursor {
        published_at: Utc::now(),
        id: "a2".to_string(),
    };
    store.save_cursor(&source_key, &second).await.unwrap();
    assert_eq!(store.load_cursor(&source_key).await.unwrap(), Some(second));
}
