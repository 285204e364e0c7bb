//! Layer 2 — the custom-channel domain.
//!
//! The only domain that reads the channel registry; admission rules live on
//! `CustomChannel::admits` (shared with the registry's own unit tests).

use super::{dedup_preserve_order, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::Article;
use crate::registry::ChannelRegistry;

pub struct CustomChannelDomain;

impl RoutingDomain for CustomChannelDomain {
    fn name(&self) -> &'static str {
        "custom_channel"
    }

    fn evaluate(&self, article: &Article, registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let routes = registry
            .enabled_channels()
            .filter(|channel| channel.admits(article))
            .map(|channel| ChannelRoute::with_channel(channel.topic_name.clone(), channel.id.clone()))
            .collect();
        dedup_preserve_order(routes)
    }
}
