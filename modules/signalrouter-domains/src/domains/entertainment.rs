//! Layer 6 — the entertainment domain.

use super::{dedup_preserve_order, slug_or_skip, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::{Article, EntertainmentRelevance};
use crate::registry::ChannelRegistry;

pub struct EntertainmentDomain;

impl RoutingDomain for EntertainmentDomain {
    fn name(&self) -> &'static str {
        "entertainment"
    }

    fn evaluate(&self, article: &Article, _registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let Some(ent) = &article.entertainment else {
            return Vec::new();
        };

        let mut routes = Vec::new();
        match ent.relevance {
            EntertainmentRelevance::NotEntertainment => return Vec::new(),
            EntertainmentRelevance::CoreEntertainment => {
                if ent.homepage_eligible {
                    routes.push(ChannelRoute::bare("entertainment:homepage"));
                }
                for category in &ent.categories {
                    if let Some(slug) = slug_or_skip(category) {
                        routes.push(ChannelRoute::bare(format!("entertainment:category:{slug}")));
                    }
                }
            }
            EntertainmentRelevance::PeripheralEntertainment => {
                routes.push(ChannelRoute::bare("entertainment:peripheral"));
            }
        }
        dedup_preserve_order(routes)
    }
}
