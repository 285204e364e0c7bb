//! Layer 7 — the Anishinaabe domain.

use super::{dedup_preserve_order, slug_or_skip, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::{Article, AnishinaabeRelevance};
use crate::registry::ChannelRegistry;

pub struct AnishinaabeDomain;

impl RoutingDomain for AnishinaabeDomain {
    fn name(&self) -> &'static str {
        "anishinaabe"
    }

    fn evaluate(&self, article: &Article, _registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let Some(classification) = &article.anishinaabe else {
            return Vec::new();
        };
        if classification.relevance == AnishinaabeRelevance::NotAnishinaabe {
            return Vec::new();
        }

        let mut routes = vec![ChannelRoute::bare("articles:anishinaabe")];
        for category in &classification.categories {
            if let Some(slug) = slug_or_skip(category) {
                routes.push(ChannelRoute::bare(format!("anishinaabe:category:{slug}")));
            }
        }
        dedup_preserve_order(routes)
    }
}
