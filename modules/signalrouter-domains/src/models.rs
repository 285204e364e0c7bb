//! The article and its nested classification envelope.
//!
//! Each classification object is its own product type with optional
//! presence — domains read only the object they own and never reach across
//! into a sibling's fields.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A classified document fetched from the document store, eligible for
/// routing. Read-only to the router; created upstream by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub source_name: String,
    pub published_at: DateTime<Utc>,
    pub quality_score: i32,
    pub topics: BTreeSet<String>,
    pub content_type: String,

    #[serde(default)]
    pub crime: Option<CrimeClassification>,
    #[serde(default)]
    pub mining: Option<MiningClassification>,
    #[serde(default)]
    pub entertainment: Option<EntertainmentClassification>,
    #[serde(default)]
    pub anishinaabe: Option<AnishinaabeClassification>,
    #[serde(default)]
    pub coforge: Option<CoforgeClassification>,

    #[serde(default)]
    pub location: Option<GeoClassification>,
}

impl Article {
    /// Only `content_type == "article"` is admitted to routing.
    pub fn is_routable_content_type(&self) -> bool {
        self.content_type == "article"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrimeRelevance {
    NotCrime,
    CoreStreetCrime,
    PeripheralCrime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrimeSubLabel {
    CriminalJustice,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrimeClassification {
    pub relevance: CrimeRelevance,
    #[serde(default)]
    pub sub_label: Option<CrimeSubLabel>,
    #[serde(default)]
    pub homepage_eligible: bool,
    #[serde(default)]
    pub category_pages: Vec<String>,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub needs_review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningRelevance {
    NotMining,
    CoreMining,
    PeripheralMining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningLocation {
    LocalCanada,
    Canada,
    International,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningClassification {
    pub relevance: MiningRelevance,
    #[serde(default)]
    pub commodities: Vec<String>,
    #[serde(default)]
    pub mining_stage: Option<String>,
    #[serde(default)]
    pub location: Option<MiningLocation>,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub needs_review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntertainmentRelevance {
    NotEntertainment,
    CoreEntertainment,
    PeripheralEntertainment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntertainmentClassification {
    pub relevance: EntertainmentRelevance,
    #[serde(default)]
    pub homepage_eligible: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub needs_review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnishinaabeRelevance {
    NotAnishinaabe,
    Relevant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnishinaabeClassification {
    pub relevance: AnishinaabeRelevance,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub needs_review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoforgeRelevance {
    NotRelevant,
    Core,
    Peripheral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoforgeClassification {
    pub relevance: CoforgeRelevance,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub needs_review: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSpecificity {
    City,
    Province,
    Country,
    International,
}

/// Geographic fields. Used by the Layer-4 location domain for the `crime`
/// and `entertainment` prefixes; mining has its own location enum
/// (`MiningLocation`) since Layer 5 owns its geography.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoClassification {
    pub specificity: LocationSpecificity,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub confidence: f32,
}

impl GeoClassification {
    pub fn is_canadian(&self) -> bool {
        self.country
            .as_deref()
            .map(|c| c.eq_ignore_ascii_case("canada"))
            .unwrap_or(false)
    }
}
