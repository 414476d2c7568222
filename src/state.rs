use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::config::{AppConfig, OpeningHoursMode};
use crate::services::gemini_service::GeminiService;
use crate::services::opening_hours_service::{
    GeminiOpeningHours, OpeningHoursSource, StaticOpeningHours,
};
use crate::services::providers::{
    GenerationError, PlaceSearchProvider, SearchError, TextGenerator,
};
use crate::services::schedule_service::ScheduleSequencer;
use crate::services::vietmap_service::VietmapService;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build Vietmap client: {0}")]
    Vietmap(#[from] SearchError),
    #[error("failed to build Gemini client: {0}")]
    Gemini(#[from] GenerationError),
}

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub search: Arc<dyn PlaceSearchProvider>,
    pub generator: Arc<dyn TextGenerator>,
    pub opening_hours: Arc<dyn OpeningHoursSource>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        search: Arc<dyn PlaceSearchProvider>,
        generator: Arc<dyn TextGenerator>,
        opening_hours: Arc<dyn OpeningHoursSource>,
    ) -> Self {
        Self {
            config,
            search,
            generator,
            opening_hours,
        }
    }

    /// Wires the production Vietmap and Gemini clients.
    pub fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let search: Arc<dyn PlaceSearchProvider> = Arc::new(VietmapService::new(&config.vietmap)?);
        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiService::new(&config.gemini)?);

        let opening_hours: Arc<dyn OpeningHoursSource> = match config.opening_hours {
            OpeningHoursMode::Static => Arc::new(StaticOpeningHours),
            OpeningHoursMode::Gemini => Arc::new(GeminiOpeningHours::new(generator.clone())),
        };
        info!(
            "Using model {} with {} opening hours",
            config.gemini.model,
            config.opening_hours.as_str()
        );

        Ok(Self::new(config, search, generator, opening_hours))
    }

    pub fn sequencer(&self) -> ScheduleSequencer {
        ScheduleSequencer::new(
            self.generator.clone(),
            self.opening_hours.clone(),
            self.config.step_delay,
        )
    }
}
