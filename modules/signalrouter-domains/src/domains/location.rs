//! Layer 4 — the location domain.
//!
//! Runs once per applicable prefix (`crime`, `entertainment`); mining owns
//! its own geography via `mining.location` and is excluded here (Layer 5).
//! Fires are additive: a local article also fires province and country.

use super::{dedup_preserve_order, slug_or_skip, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::{
    Article, CrimeRelevance, EntertainmentRelevance, GeoClassification, LocationSpecificity,
};
use crate::registry::ChannelRegistry;

pub struct LocationDomain;

impl RoutingDomain for LocationDomain {
    fn name(&self) -> &'static str {
        "location"
    }

    fn evaluate(&self, article: &Article, _registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let Some(geo) = &article.location else {
            return Vec::new();
        };

        let mut routes = Vec::new();

        let crime_applies = matches!(
            article.crime.as_ref().map(|c| c.relevance),
            Some(r) if r != CrimeRelevance::NotCrime
        );
        if crime_applies {
            routes.extend(fires_for_prefix("crime", geo));
        }

        let entertainment_applies = matches!(
            article.entertainment.as_ref().map(|e| e.relevance),
            Some(r) if r != EntertainmentRelevance::NotEntertainment
        );
        if entertainment_applies {
            routes.extend(fires_for_prefix("entertainment", geo));
        }

        dedup_preserve_order(routes)
    }
}

fn fires_for_prefix(prefix: &str, geo: &GeoClassification) -> Vec<ChannelRoute> {
    let mut routes = Vec::new();

    if geo.specificity == LocationSpecificity::City {
        if let Some(slug) = geo.city.as_deref().and_then(slug_or_skip) {
            routes.push(ChannelRoute::bare(format!("{prefix}:local:{slug}")));
        }
    }

    if let Some(slug) = geo.province.as_deref().and_then(slug_or_skip) {
        routes.push(ChannelRoute::bare(format!("{prefix}:province:{slug}")));
    }

    if geo.is_canadian() {
        routes.push(ChannelRoute::bare(format!("{prefix}:canada")));
    } else if geo.specificity == LocationSpecificity::International {
        routes.push(ChannelRoute::bare(format!("{prefix}:international")));
    }

    routes
}
