//! Layer 3 — the crime classification domain.

use super::{dedup_preserve_order, slug_or_skip, RoutingDomain};
use crate::channel_route::ChannelRoute;
use crate::models::{Article, CrimeRelevance, CrimeSubLabel};
use crate::registry::ChannelRegistry;

pub struct CrimeDomain;

impl RoutingDomain for CrimeDomain {
    fn name(&self) -> &'static str {
        "crime"
    }

    fn evaluate(&self, article: &Article, _registry: &ChannelRegistry) -> Vec<ChannelRoute> {
        let Some(crime) = &article.crime else {
            return Vec::new();
        };

        let mut routes = Vec::new();
        match crime.relevance {
            CrimeRelevance::NotCrime => return Vec::new(),
            CrimeRelevance::CoreStreetCrime => {
                if crime.homepage_eligible {
                    routes.push(ChannelRoute::bare("crime:homepage"));
                }
                for page in &crime.category_pages {
                    if let Some(slug) = slug_or_skip(page) {
                        routes.push(ChannelRoute::bare(format!("crime:category:{slug}")));
                    }
                }
            }
            CrimeRelevance::PeripheralCrime => {
                if crime.sub_label == Some(CrimeSubLabel::CriminalJustice) {
                    routes.push(ChannelRoute::bare("crime:courts"));
                } else {
                    routes.push(ChannelRoute::bare("crime:context"));
                }
            }
        }
        dedup_preserve_order(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrimeClassification;
    use chrono::Utc;

    fn article_with(crime: Option<CrimeClassification>) -> Article {
        Article {
            id: "a1".into(),
            title: "t".into(),
            body: "b".into(),
            url: "https://example.com/a1".into(),
            source_name: "src".into(),
            published_at: Utc::now(),
            quality_score: 82,
            topics: Default::default(),
            content_type: "article".into(),
            crime,
            mining: None,
            entertainment: None,
            anishinaabe: None,
            coforge: None,
            location: None,
        }
    }

    #[test]
    fn core_street_crime_emits_homepage_and_categories() {
        let art = article_with(Some(CrimeClassification {
            relevance: CrimeRelevance::CoreStreetCrime,
            sub_label: None,
            homepage_eligible: true,
            category_pages: vec!["violent-crime".into(), "crime".into()],
            confidence: 0.9,
            needs_review: false,
        }));
        let routes = CrimeDomain.evaluate(&art, &ChannelRegistry::default());
        let topics: Vec<_> = routes.into_iter().map(|r| r.topic).collect();
        assert_eq!(
            topics,
            vec!["crime:homepage", "crime:category:violent-crime", "crime:category:crime"]
        );
    }

    #[test]
    fn peripheral_criminal_justice_emits_courts() {
        let art = article_with(Some(CrimeClassification {
            relevance: CrimeRelevance::PeripheralCrime,
            sub_label: Some(CrimeSubLabel::CriminalJustice),
            homepage_eligible: false,
            category_pages: vec![],
            confidence: 0.5,
            needs_review: false,
        }));
        let routes = CrimeDomain.evaluate(&art, &ChannelRegistry::default());
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].topic, "crime:courts");
    }

    #[test]
    fn peripheral_other_emits_context() {
        let art = article_with(Some(CrimeClassification {
            relevance: CrimeRelevance::PeripheralCrime,
            sub_label: Some(CrimeSubLabel::Other),
            homepage_eligible: false,
            category_pages: vec![],
            confidence: 0.5,
            needs_review: false,
        }));
        let routes = CrimeDomain.evaluate(&art, &ChannelRegistry::default());
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].topic, "crime:context");
    }

    #[test]
    fn not_crime_emits_nothing() {
        let art = article_with(Some(CrimeClassification {
            relevance: CrimeRelevance::NotCrime,
            sub_label: None,
            homepage_eligible: false,
            category_pages: vec![],
            confidence: 0.0,
            needs_review: false,
        }));
        assert!(CrimeDomain.evaluate(&art, &ChannelRegistry::default()).is_empty());
    }

    #[test]
    fn absent_classification_emits_nothing() {
        let art = article_with(None);
        assert!(CrimeDomain.evaluate(&art, &ChannelRegistry::default()).is_empty());
    }
}
