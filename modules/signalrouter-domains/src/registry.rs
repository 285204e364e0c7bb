//! Operator-defined channel configuration: custom channels and routes.
//!
//! These types are the read side of the channel registry: loaded by the
//! history/cursor store from the config database and handed to the Layer-2
//! domain as an immutable snapshot, swapped atomically on refresh.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An operator-defined destination with filter rules (Layer 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomChannel {
    pub id: String,
    pub topic_name: String,
    pub enabled: bool,
    #[serde(default)]
    pub include_topics: BTreeSet<String>,
    #[serde(default)]
    pub exclude_topics: BTreeSet<String>,
    pub min_quality: i32,
    #[serde(default)]
    pub content_types: BTreeSet<String>,
}

impl CustomChannel {
    /// Content-type allowed, quality floor met, at least one included
    /// topic (or an empty include set admits everything), and no excluded
    /// topic present.
    pub fn admits(&self, article: &crate::models::Article) -> bool {
        if !self.enabled {
            return false;
        }
        if !self.content_types.is_empty() && !self.content_types.contains(&article.content_type) {
            return false;
        }
        if article.quality_score < self.min_quality {
            return false;
        }
        let include_ok = self.include_topics.is_empty()
            || self
                .include_topics
                .intersection(&article.topics)
                .next()
                .is_some();
        if !include_ok {
            return false;
        }
        self.exclude_topics.intersection(&article.topics).next().is_none()
    }
}

/// A monitored document-store index. Identity is `index_pattern`, matched
/// exactly against a discovered index name; at most one enabled `Source`
/// exists per `index_pattern`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub index_pattern: String,
    pub enabled: bool,
    pub name: String,
}

/// Many-to-many binding of a Source to a Custom Channel with per-binding
/// filters. Used by the Layer-2 evaluator only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub source_index_pattern: String,
    pub channel_id: String,
    #[serde(default)]
    pub min_quality_score: Option<i32>,
    #[serde(default)]
    pub topics: Option<BTreeSet<String>>,
}

/// Immutable snapshot of the channel registry, swapped atomically on refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelRegistry {
    pub channels: Vec<CustomChannel>,
}

impl ChannelRegistry {
    pub fn new(channels: Vec<CustomChannel>) -> Self {
        Self { channels }
    }

    pub fn enabled_channels(&self) -> impl Iterator<Item = &CustomChannel> {
        self.channels.iter().filter(|c| c.enabled)
    }
}
