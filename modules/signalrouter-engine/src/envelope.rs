//! The publish envelope: every payload published to the bus is the full
//! article document with one added top-level `publisher` object. All other
//! article fields pass through unchanged.

use chrono::Utc;
use serde_json::{Map, Value};
use signalrouter_domains::{Article, ChannelRoute};

/// Builds the JSON payload for one `(article, channel)` publish. `channel_id`
/// is the Layer-2 channel id when present, `null` for every other layer.
pub fn build_envelope(article: &Article, route: &ChannelRoute) -> Map<String, Value> {
    let mut payload = match serde_json::to_value(article) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let mut publisher = Map::new();
    publisher.insert(
        "channel_id".to_string(),
        route
            .channel_id
            .as_ref()
            .map(|id| Value::String(id.clone()))
            .unwrap_or(Value::Null),
    );
    publisher.insert(
        "published_at".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    publisher.insert("channel".to_string(), Value::String(route.topic.clone()));

    payload.insert("publisher".to_string(), Value::Object(publisher));
    payload
}
