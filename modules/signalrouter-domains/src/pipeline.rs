//! Runs all eight routing domains over one article in fixed order and
//! produces the deduplicated candidate channel set.

use std::collections::HashMap;

use tracing::warn;

use crate::channel_route::ChannelRoute;
use crate::domains::{ordered_domains, RoutingDomain};
use crate::models::Article;
use crate::registry::ChannelRegistry;

/// Evaluates the eight domains in order and merges their output into one
/// deduplicated list, keyed by channel name.
///
/// `channel_id` is preserved from the custom-channel domain (Layer 2) when
/// the same topic is also emitted by the topic domain (Layer 1): whichever
/// domain runs first establishes the topic's position in the result, but a
/// later route for the same topic with a non-null `channel_id` overwrites
/// the stored one.
pub struct RoutingPipeline {
    domains: Vec<Box<dyn RoutingDomain + Send + Sync>>,
}

impl Default for RoutingPipeline {
    fn default() -> Self {
        Self {
            domains: ordered_domains(),
        }
    }
}

impl RoutingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&self, article: &Article, registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let mut order: Vec<String> = Vec::new();
        let mut by_topic: HashMap<String, ChannelRoute> = HashMap::new();

        for domain in &self.domains {
            let routes = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                domain.evaluate(article, registry)
            }))
            .unwrap_or_else(|_| {
                warn!(domain = domain.name(), article_id = %article.id, "routing domain panicked, treating as empty");
                Vec::new()
            });

            for route in routes {
                match by_topic.get_mut(&route.topic) {
                    None => {
                        order.push(route.topic.clone());
                        by_topic.insert(route.topic.clone(), route);
                    }
                    Some(existing) => {
                        if existing.channel_id.is_none() && route.channel_id.is_some() {
                            existing.channel_id = route.channel_id;
                            existing.route_id = route.route_id;
                        }
                    }
                }
            }
        }

        order
            .into_iter()
            .filter_map(|topic| by_topic.remove(&topic))
            .collect()
    }
}
