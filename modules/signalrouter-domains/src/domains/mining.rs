//! Layer 5 — the mining domain.
//!
//! Owns the `mining` topic catch-all that Layer 1 deliberately skips, plus
//! its own geography (`mining.location`), independent of Layer 4.

use super::{dedup_preserve_order, slug_or_skip, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::{Article, MiningLocation, MiningRelevance};
use crate::registry::ChannelRegistry;

pub struct MiningDomain;

impl RoutingDomain for MiningDomain {
    fn name(&self) -> &'static str {
        "mining"
    }

    fn evaluate(&self, article: &Article, _registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let Some(mining) = &article.mining else {
            return Vec::new();
        };
        if mining.relevance == MiningRelevance::NotMining {
            return Vec::new();
        }

        let mut routes = vec![ChannelRoute::bare("articles:mining")];

        routes.push(ChannelRoute::bare(match mining.relevance {
            MiningRelevance::CoreMining => "mining:core",
            MiningRelevance::PeripheralMining => "mining:peripheral",
            MiningRelevance::NotMining => unreachable!("checked above"),
        }));

        for commodity in &mining.commodities {
            if let Some(slug) = slug_or_skip(commodity) {
                routes.push(ChannelRoute::bare(format!("mining:commodity:{slug}")));
            }
        }

        if let Some(stage) = &mining.mining_stage {
            if stage != "unspecified" {
                if let Some(slug) = slug_or_skip(stage) {
                    routes.push(ChannelRoute::bare(format!("mining:stage:{slug}")));
                }
            }
        }

        match mining.location {
            Some(MiningLocation::LocalCanada) | Some(MiningLocation::Canada) => {
                routes.push(ChannelRoute::bare("mining:canada"));
            }
            Some(MiningLocation::International) => {
                routes.push(ChannelRoute::bare("mining:international"));
            }
            None => {}
        }

        dedup_preserve_order(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, MiningClassification};
    use chrono::Utc;

    fn article_with(mining: Option<MiningClassification>) -> Article {
        Article {
            id: "m1".into(),
            title: "t".into(),
            body: "b".into(),
            url: "https://example.com/m1".into(),
            source_name: "src".into(),
            published_at: Utc::now(),
            quality_score: 80,
            topics: ["mining".to_string(), "commodities".to_string()]
                .into_iter()
                .collect(),
            content_type: "article".into(),
            crime: None,
            mining,
            entertainment: None,
            anishinaabe: None,
            coforge: None,
            location: None,
        }
    }

    #[test]
    fn core_mining_with_commodities_and_local_canada() {
        let art = article_with(Some(MiningClassification {
            relevance: MiningRelevance::CoreMining,
            commodities: vec!["gold".into(), "rare_earths".into()],
            mining_stage: Some("production".into()),
            location: Some(MiningLocation::LocalCanada),
            confidence: 0.9,
            needs_review: false,
        }));
        let routes = MiningDomain.evaluate(&art, &ChannelRegistry::default());
        let topics: Vec<_> = routes.into_iter().map(|r| r.topic).collect();
        assert_eq!(
            topics,
            vec![
                "articles:mining",
                "mining:core",
                "mining:commodity:gold",
                "mining:commodity:rare-earths",
                "mining:stage:production",
                "mining:canada",
            ]
        );
    }

    #[test]
    fn unspecified_stage_is_not_emitted() {
        let art = article_with(Some(MiningClassification {
            relevance: MiningRelevance::PeripheralMining,
            commodities: vec![],
            mining_stage: Some("unspecified".into()),
            location: None,
            confidence: 0.5,
            needs_review: false,
        }));
        let routes = MiningDomain.evaluate(&art, &ChannelRegistry::default());
        let topics: Vec<_> = routes.into_iter().map(|r| r.topic).collect();
        assert_eq!(topics, vec!["articles:mining", "mining:peripheral"]);
    }

    #[test]
    fn not_mining_emits_nothing_including_no_catch_all() {
        let art = article_with(Some(MiningClassification {
            relevance: MiningRelevance::NotMining,
            commodities: vec![],
            mining_stage: None,
            location: None,
            confidence: 0.0,
            needs_review: false,
        }));
        assert!(MiningDomain.evaluate(&art, &ChannelRegistry::default()).is_empty());
    }
}
