//! Bus Adapter: fire-and-forget publish of a JSON payload to a named
//! pub/sub topic. No built-in retry — subscribers not connected at publish
//! time permanently miss the message, by design.

use async_trait::async_trait;
use serde_json::Map as JsonMap;
use serde_json::Value;
use signalrouter_common::RouterError;
use tracing::warn;

/// The bus boundary. `Publish` returning `Ok` means the bus accepted the
/// message, not that any subscriber received it.
#[async_trait]
pub trait BusAdapter: Send + Sync {
    async fn publish(&self, topic: &str, payload: &JsonMap<String, Value>) -> Result<(), RouterError>;
}

/// Production adapter speaking to an HTTP-fronted pub/sub bus.
pub struct HttpBusAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBusAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BusAdapter for HttpBusAdapter {
    async fn publish(&self, topic: &str, payload: &JsonMap<String, Value>) -> Result<(), RouterError> {
        let body = serde_json::to_vec(payload).map_err(|e| {
            RouterError::Permanent(format!("payload for topic {topic} failed to serialize: {e}"))
        })?;

        let resp = self
            .client
            .post(format!("{}/topics/{}/publish", self.base_url, topic))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(classify_publish_error)?;

        if !resp.status().is_success() {
            let status = resp.status();
            warn!(topic, %status, "bus rejected publish");
            return Err(RouterError::Transient(format!(
                "bus returned {status} for topic {topic}"
            )));
        }

        Ok(())
    }
}

fn classify_publish_error(err: reqwest::Error) -> RouterError {
    if err.is_timeout() || err.is_connect() {
        RouterError::Transient(err.to_string())
    } else {
        RouterError::Transient(err.to_string())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::sync::Mutex;

    /// In-memory bus adapter for orchestrator tests. Records every accepted
    /// publish so tests can assert on topic/payload without a live bus.
    #[derive(Default)]
    pub struct FakeBusAdapter {
        published: Mutex<Vec<(String, JsonMap<String, Value>)>>,
        fail_once: Mutex<Vec<String>>,
    }

    impl FakeBusAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// The next publish to this topic returns `Transient` instead of
        /// succeeding and is not recorded.
        pub fn fail_once(&self, topic: &str) {
            self.fail_once.lock().unwrap().push(topic.to_string());
        }

        pub fn published(&self) -> Vec<(String, JsonMap<String, Value>)> {
            self.published.lock().unwrap().clone()
        }

        pub fn publish_count(&self, topic: &str) -> usize {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter(|(t, _)| t == topic)
                .count()
        }
    }

    #[async_trait]
    impl BusAdapter for FakeBusAdapter {
        async fn publish(&self, topic: &str, payload: &JsonMap<String, Value>) -> Result<(), RouterError> {
            let mut fail_once = self.fail_once.lock().unwrap();
            if let Some(pos) = fail_once.iter().position(|t| t == topic) {
                fail_once.remove(pos);
                return Err(RouterError::Transient("simulated bus failure".into()));
            }
            drop(fail_once);

            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), payload.clone()));
            Ok(())
        }
    }
}
