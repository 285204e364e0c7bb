//! The eight routing-rule modules and the fixed order they run in.

mod anishinaabe;
mod coforge;
mod crime;
mod custom_channel;
mod entertainment;
mod location;
mod mining;
mod topic;

use crate::channel_route::ChannelRoute;
use crate::models::Article;
use crate::registry::ChannelRegistry;

/// One of the eight routing-rule modules: a pure `Article -> [ChannelRoute]`
/// mapping. Any per-domain programming failure is caught by the pipeline
/// runner, logged, and treated as an empty candidate list — domains
/// themselves never panic across this boundary on well-formed input, but the
/// runner does not trust that promise.
pub trait RoutingDomain {
    fn name(&self) -> &'static str;

    /// Custom-channel (Layer 2) is the only domain that reads the registry;
    /// every other domain ignores it.
    fn evaluate(&self, article: &Article, registry: &ChannelRegistry) -> Vec<ChannelRoute>;
}

/// Fixed evaluation order, 1 through 8. The order matters: `channel_id`
/// precedence in the pipeline dedup step depends on Layer 2 being evaluated
/// after Layer 1.
pub fn ordered_domains() -> Vec<Box<dyn RoutingDomain + Send + Sync>> {
    vec![
        Box::new(topic::TopicDomain),
        Box::new(custom_channel::CustomChannelDomain),
        Box::new(crime::CrimeDomain),
        Box::new(location::LocationDomain),
        Box::new(mining::MiningDomain),
        Box::new(entertainment::EntertainmentDomain),
        Box::new(anishinaabe::AnishinaabeDomain),
        Box::new(coforge::CoforgeDomain),
    ]
}

/// Dedup within one domain's own output, preserving first occurrence.
pub(crate) fn dedup_preserve_order(routes: Vec<ChannelRoute>) -> Vec<ChannelRoute> {
    let mut seen = std::collections::HashSet::new();
    routes
        .into_iter()
        .filter(|r| seen.insert(r.topic.clone()))
        .collect()
}

/// Normalizes a raw label to a slug and discards it if normalization yields
/// an empty string.
pub(crate) fn slug_or_skip(label: &str) -> Option<String> {
    let slug = signalrouter_common::slugify(label);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}
