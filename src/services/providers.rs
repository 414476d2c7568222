use async_trait::async_trait;
use thiserror::Error;

use crate::models::search::{ProviderPlace, SearchQuery};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generation provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("generation provider returned no text")]
    EmptyResponse,
}

/// Nearby-place lookup (Vietmap in production).
#[async_trait]
pub trait PlaceSearchProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProviderPlace>, SearchError>;
}

/// Prompt in, free-form text out (Gemini in production). Callers parse the text themselves.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
