//! Layer 8 — the Coforge domain. No catch-all, unlike mining and
//! Anishinaabe.

use super::{dedup_preserve_order, slug_or_skip, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::{Article, CoforgeRelevance};
use crate::registry::ChannelRegistry;

pub struct CoforgeDomain;

impl RoutingDomain for CoforgeDomain {
    fn name(&self) -> &'static str {
        "coforge"
    }

    fn evaluate(&self, article: &Article, _registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let Some(coforge) = &article.coforge else {
            return Vec::new();
        };

        let mut routes = match coforge.relevance {
            CoforgeRelevance::NotRelevant => return Vec::new(),
            CoforgeRelevance::Core => vec![ChannelRoute::bare("coforge:core")],
            CoforgeRelevance::Peripheral => vec![ChannelRoute::bare("coforge:peripheral")],
        };

        if let Some(audience) = coforge.audience.as_deref().and_then(slug_or_skip) {
            routes.push(ChannelRoute::bare(format!("coforge:audience:{audience}")));
        }
        for topic in &coforge.topics {
            if let Some(slug) = slug_or_skip(topic) {
                routes.push(ChannelRoute::bare(format!("coforge:topic:{slug}")));
            }
        }
        for industry in &coforge.industries {
            if let Some(slug) = slug_or_skip(industry) {
                routes.push(ChannelRoute::bare(format!("coforge:industry:{slug}")));
            }
        }

        dedup_preserve_order(routes)
    }
}
