use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

use crate::config::VietmapConfig;
use crate::models::search::{ProviderPlace, SearchQuery};
use crate::services::providers::{PlaceSearchProvider, SearchError};

/// Client for the Vietmap `search/v3` endpoint.
#[derive(Clone)]
pub struct VietmapService {
    client: Client,
    search_url: String,
    api_key: String,
}

impl VietmapService {
    pub fn new(config: &VietmapConfig) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            search_url: config.search_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn query_params(&self, query: &SearchQuery) -> Vec<(&'static str, String)> {
        let focus = query.focus.to_query_value();
        let mut params = vec![
            ("apikey", self.api_key.clone()),
            ("text", query.text.clone()),
            ("focus", focus.clone()),
            ("circle_center", focus),
            ("circle_radius", query.radius_meters.to_string()),
        ];
        if let Some(category) = &query.category {
            params.push(("cats", category.clone()));
        }
        params
    }
}

#[async_trait]
impl PlaceSearchProvider for VietmapService {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProviderPlace>, SearchError> {
        debug!(
            "Vietmap search text='{}' category={:?} focus={}",
            query.text,
            query.category,
            query.focus.to_query_value()
        );

        let response = self
            .client
            .get(&self.search_url)
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Anything other than a JSON array means "no results" for this query.
        let body: serde_json::Value = response.json().await?;
        match body {
            serde_json::Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<ProviderPlace>(item) {
                    Ok(place) => Some(place),
                    Err(e) => {
                        warn!("Skipping malformed Vietmap item: {}", e);
                        None
                    }
                })
                .collect()),
            other => {
                debug!("Vietmap returned a non-list body: {}", other);
                Ok(Vec::new())
            }
        }
    }
}
