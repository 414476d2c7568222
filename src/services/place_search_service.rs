use std::collections::HashSet;

use futures::future::try_join_all;
use log::info;
use thiserror::Error;

use crate::models::place::Coordinate;
use crate::models::search::{PlaceSummary, ProviderPlace, SearchQuery, SearchRequest};
use crate::services::category_service::{keywords_for, resolve_keywords};
use crate::services::providers::{PlaceSearchProvider, SearchError};

#[derive(Debug, Error)]
pub enum PlaceSearchError {
    #[error("no keywords found for the given categories")]
    NoKeywords,
    #[error(transparent)]
    Provider(#[from] SearchError),
}

/// One query per known category code, run concurrently, merged by `ref_id`.
pub async fn search_places(
    provider: &dyn PlaceSearchProvider,
    request: &SearchRequest,
    radius_meters: u32,
) -> Result<Vec<PlaceSummary>, PlaceSearchError> {
    if resolve_keywords(request.categories.as_slice()).is_empty() {
        return Err(PlaceSearchError::NoKeywords);
    }
    let queries = category_queries(&request.categories, request.location, radius_meters);

    info!(
        "Searching {} categories around {}",
        queries.len(),
        request.location.to_query_value()
    );

    let batches = try_join_all(queries.iter().map(|query| provider.search(query))).await?;
    let places = dedupe_by_ref_id(batches.into_iter().flatten());

    info!("Search returned {} unique places", places.len());
    Ok(places.into_iter().map(PlaceSummary::from).collect())
}

/// Builds the per-category queries. Unknown and repeated codes are skipped.
pub fn category_queries(
    codes: &[String],
    focus: Coordinate,
    radius_meters: u32,
) -> Vec<SearchQuery> {
    let mut seen = HashSet::new();

    codes
        .iter()
        .filter(|code| seen.insert(code.as_str()))
        .filter_map(|code| {
            keywords_for(code).map(|keywords| SearchQuery {
                text: keywords.join(" "),
                focus,
                radius_meters,
                category: Some(code.clone()),
            })
        })
        .collect()
}

/// Keeps the first item for each `ref_id`; items without one are dropped.
pub fn dedupe_by_ref_id<I>(items: I) -> Vec<ProviderPlace>
where
    I: IntoIterator<Item = ProviderPlace>,
{
    let mut seen = HashSet::new();

    items
        .into_iter()
        .filter(|item| match &item.ref_id {
            Some(ref_id) => seen.insert(ref_id.clone()),
            None => false,
        })
        .collect()
}
