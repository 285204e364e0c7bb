//! Candidate routing destinations emitted by a routing domain.

use serde::{Deserialize, Serialize};

/// One candidate channel a routing domain wants an article published to.
///
/// `channel_id` and `route_id` are only populated when the route came from
/// the channel registry (a configured custom channel or topic route); a
/// domain-computed topic like `crime-core-street-crime` carries neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRoute {
    pub topic: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub route_id: Option<String>,
}

impl ChannelRoute {
    pub fn bare(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            channel_id: None,
            route_id: None,
        }
    }

    pub fn with_channel(topic: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            channel_id: Some(channel_id.into()),
            route_id: None,
        }
    }

    pub fn with_route(
        topic: impl Into<String>,
        channel_id: impl Into<String>,
        route_id: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            channel_id: Some(channel_id.into()),
            route_id: Some(route_id.into()),
        }
    }
}
