use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;

use crate::models::place::{OpeningHours, Place, WeeklyHours};
use crate::services::ai_parsing::parse_ai_json;
use crate::services::prompts::opening_hours_prompt;
use crate::services::providers::TextGenerator;

const STANDARD_HOURS: &str = "08:00 - 17:00";
const ESTIMATED_HOURS_NOTE: &str = "08:00 - 17:00 (estimated)";

/// Opening-hours lookup. Never fails: an unknown place comes back with `found = false`.
#[async_trait]
pub trait OpeningHoursSource: Send + Sync {
    async fn lookup(&self, place: &Place) -> OpeningHours;
}

/// Assumes standard business hours every day.
#[derive(Debug, Clone, Default)]
pub struct StaticOpeningHours;

#[async_trait]
impl OpeningHoursSource for StaticOpeningHours {
    async fn lookup(&self, _place: &Place) -> OpeningHours {
        let week = WeeklyHours::uniform(STANDARD_HOURS);
        OpeningHours {
            found: true,
            weekday_text: week.weekday_text(),
            opening_hours: Some(week),
            is_open_now: Some(true),
            notes: "Regular opening hours".to_string(),
            source: "Google Maps".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct HoursResponse {
    found: bool,
    #[serde(default)]
    opening_hours: Option<WeeklyHours>,
    #[serde(default)]
    is_open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    estimated_hours: Option<String>,
}

/// Asks the generative provider what it knows about a place's hours.
pub struct GeminiOpeningHours {
    generator: Arc<dyn TextGenerator>,
}

impl GeminiOpeningHours {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn not_found(note: String) -> OpeningHours {
        OpeningHours {
            found: false,
            opening_hours: None,
            is_open_now: None,
            weekday_text: Vec::new(),
            notes: note,
            source: "Estimate".to_string(),
        }
    }
}

#[async_trait]
impl OpeningHoursSource for GeminiOpeningHours {
    async fn lookup(&self, place: &Place) -> OpeningHours {
        let text = match self
            .generator
            .generate(&opening_hours_prompt(&place.name, &place.address))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Opening hours lookup failed for {}: {}", place.name, e);
                return Self::not_found(ESTIMATED_HOURS_NOTE.to_string());
            }
        };

        let response = match parse_ai_json::<HoursResponse>(&text) {
            Ok(response) => response,
            Err(e) => {
                warn!("Unreadable opening hours for {}: {}", place.name, e);
                return Self::not_found(ESTIMATED_HOURS_NOTE.to_string());
            }
        };

        if !response.found {
            debug!("No opening hours known for {}", place.name);
            let estimate = response
                .estimated_hours
                .unwrap_or_else(|| ESTIMATED_HOURS_NOTE.to_string());
            let note = match response.notes {
                Some(notes) if !notes.is_empty() => format!("{}. {}", estimate, notes),
                _ => estimate,
            };
            return Self::not_found(note);
        }

        let weekday_text = if response.weekday_text.is_empty() {
            response
                .opening_hours
                .as_ref()
                .map(WeeklyHours::weekday_text)
                .unwrap_or_default()
        } else {
            response.weekday_text
        };

        OpeningHours {
            found: true,
            opening_hours: response.opening_hours,
            is_open_now: response.is_open_now,
            weekday_text,
            notes: response.notes.unwrap_or_default(),
            source: response.source.unwrap_or_else(|| "Gemini".to_string()),
        }
    }
}
