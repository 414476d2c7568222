use serde::{Deserialize, Serialize};

use super::place::Coordinate;
use super::search::PlaceSummary;

fn default_max_results() -> usize {
    5
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecommendationRequest {
    pub location: Coordinate,
    /// e.g. "a romantic cafe", "somewhere for a family dinner"
    pub user_query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Recommendation {
    #[serde(default)]
    pub rank: u32,
    pub place_name: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RankedRecommendations {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RecommendationResponse {
    Ranked {
        ai_enabled: bool,
        analysis: String,
        recommendations: Vec<Recommendation>,
        raw_places: Vec<PlaceSummary>,
    },
    Fallback {
        ai_enabled: bool,
        error: String,
        recommendations: Vec<PlaceSummary>,
    },
}
