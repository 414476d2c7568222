#![allow(dead_code)]

use actix_web::{web, App};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vietmap_trip_api::config::{
    allowed_origins, AppConfig, GeminiConfig, OpeningHoursMode, VietmapConfig,
};
use vietmap_trip_api::models::search::{ProviderPlace, SearchQuery};
use vietmap_trip_api::routes;
use vietmap_trip_api::services::opening_hours_service::{OpeningHoursSource, StaticOpeningHours};
use vietmap_trip_api::services::providers::{
    GenerationError, PlaceSearchProvider, SearchError, TextGenerator,
};
use vietmap_trip_api::state::AppState;

/// Search provider answering from a table keyed by category code.
/// Queries without a category use the `""` entry.
#[derive(Default)]
pub struct FakeSearch {
    results: HashMap<String, Vec<ProviderPlace>>,
    fail: bool,
    queries: Mutex<Vec<SearchQuery>>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, category: &str, places: Vec<ProviderPlace>) -> Self {
        self.results.insert(category.to_string(), places);
        self
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaceSearchProvider for FakeSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProviderPlace>, SearchError> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(SearchError::Status {
                status: 401,
                body: "invalid apikey".to_string(),
            });
        }
        let key = query.category.clone().unwrap_or_default();
        Ok(self.results.get(&key).cloned().unwrap_or_default())
    }
}

/// Text generator that replies in call order and records every prompt.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        allowed_origins: allowed_origins(None),
        vietmap: VietmapConfig {
            api_key: "vietmap-test-key".to_string(),
            search_url: "http://127.0.0.1:9/search".to_string(),
            timeout: Duration::from_secs(5),
            radius_meters: 20_000,
        },
        gemini: GeminiConfig {
            api_key: "gemini-test-key".to_string(),
            model: "test-model".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(5),
        },
        step_delay: Duration::ZERO,
        opening_hours: OpeningHoursMode::Static,
    }
}

pub struct TestApp {
    pub search: Arc<FakeSearch>,
    pub generator: Arc<ScriptedGenerator>,
    state: web::Data<AppState>,
}

impl TestApp {
    pub fn new(search: FakeSearch, generator: ScriptedGenerator) -> Self {
        Self::with_hours(search, generator, Arc::new(StaticOpeningHours))
    }

    pub fn with_hours(
        search: FakeSearch,
        generator: ScriptedGenerator,
        hours: Arc<dyn OpeningHoursSource>,
    ) -> Self {
        let search = Arc::new(search);
        let generator = Arc::new(generator);
        let state = AppState::new(test_config(), search.clone(), generator.clone(), hours);

        Self {
            search,
            generator,
            state: web::Data::new(state),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure)
    }
}

pub fn provider_place(ref_id: &str, name: &str, distance: f64) -> ProviderPlace {
    ProviderPlace {
        ref_id: Some(ref_id.to_string()),
        distance: Some(distance),
        address: Some(format!("{} street, Hanoi", name)),
        name: Some(name.to_string()),
        display: Some(format!("{}, Hanoi", name)),
        categories: None,
    }
}

/// Splits an event-stream body into its JSON payloads.
pub fn parse_frames(body: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(body)
        .split("\n\n")
        .filter_map(|frame| frame.trim().strip_prefix("data: "))
        .map(|payload| serde_json::from_str(payload).unwrap())
        .collect()
}

pub fn statuses(frames: &[serde_json::Value]) -> Vec<String> {
    frames
        .iter()
        .map(|f| f["status"].as_str().unwrap_or_default().to_string())
        .collect()
}
