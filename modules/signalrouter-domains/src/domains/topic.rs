//! Layer 1 — the topic domain.

use super::{dedup_preserve_order, slug_or_skip, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::Article;
use crate::registry::ChannelRegistry;

/// Topics whose semantics are owned by a dedicated downstream domain; Layer 1
/// never emits `articles:{t}` for these — that topic is only reachable
/// through its owning domain.
const SKIP_SET: [&str; 3] = ["mining", "anishinaabe", "coforge"];

pub struct TopicDomain;

impl RoutingDomain for TopicDomain {
    fn name(&self) -> &'static str {
        "topic"
    }

    fn evaluate(&self, article: &Article, _registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let routes = article
            .topics
            .iter()
            .filter(|t| !SKIP_SET.contains(&t.as_str()))
            .filter_map(|t| slug_or_skip(t))
            .map(|slug| ChannelRoute::bare(format!("articles:{slug}")))
            .collect();
        dedup_preserve_order(routes)
    }
}
