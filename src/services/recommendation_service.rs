use log::{info, warn};

use crate::models::recommendation::{
    RankedRecommendations, RecommendationRequest, RecommendationResponse,
};
use crate::models::search::{PlaceSummary, SearchQuery};
use crate::services::ai_parsing::parse_ai_json;
use crate::services::place_search_service::dedupe_by_ref_id;
use crate::services::prompts::recommendation_prompt;
use crate::services::providers::{PlaceSearchProvider, SearchError, TextGenerator};

/// Only this many places are shown to the model.
const MAX_PROMPT_PLACES: usize = 20;

/// Free-text search around the origin, ranked by the generative provider.
///
/// Search failures propagate; ranking failures degrade to the nearest results.
pub async fn recommend_places(
    search: &dyn PlaceSearchProvider,
    generator: &dyn TextGenerator,
    request: &RecommendationRequest,
    radius_meters: u32,
) -> Result<RecommendationResponse, SearchError> {
    let query = SearchQuery {
        text: request.user_query.trim().to_string(),
        focus: request.location,
        radius_meters,
        category: None,
    };

    let places: Vec<PlaceSummary> = dedupe_by_ref_id(search.search(&query).await?)
        .into_iter()
        .map(PlaceSummary::from)
        .collect();
    info!(
        "Ranking {} places for '{}'",
        places.len(),
        request.user_query
    );

    let shown = &places[..places.len().min(MAX_PROMPT_PLACES)];
    let ranked = match generator
        .generate(&recommendation_prompt(&request.user_query, shown))
        .await
    {
        Ok(text) => parse_ai_json::<RankedRecommendations>(&text).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    Ok(match ranked {
        Ok(ranked) => RecommendationResponse::Ranked {
            ai_enabled: true,
            analysis: ranked.analysis,
            recommendations: ranked.recommendations,
            raw_places: places,
        },
        Err(error) => {
            warn!("Recommendation ranking failed: {}", error);
            RecommendationResponse::Fallback {
                ai_enabled: true,
                error,
                recommendations: places.into_iter().take(request.max_results).collect(),
            }
        }
    })
}
