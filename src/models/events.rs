use serde::Serialize;

use super::place::PlaceWithHours;
use super::schedule::{OptimizationResult, ScheduleResult, ScheduledStop};

/// Status frames pushed to the client while a schedule is built.
///
/// A stream ends after `Done` (which always follows `Completed`) or after `Error`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleEvent {
    Optimizing {
        message: String,
    },
    Optimized {
        message: String,
        optimization: OptimizationResult,
    },
    Processing {
        message: String,
    },
    FetchingHours {
        place: String,
        message: String,
        progress: usize,
        total: usize,
    },
    PlaceHoursReady {
        data: PlaceWithHours,
    },
    AiStart {
        message: String,
        total_places: usize,
    },
    AiProcessingPlace {
        place: String,
        message: String,
        progress: usize,
        total: usize,
    },
    PlaceScheduled {
        place: String,
        data: ScheduledStop,
        progress: usize,
        total: usize,
    },
    PlaceError {
        place: String,
        error: String,
        progress: usize,
        total: usize,
    },
    GeneratingSummary {
        message: String,
    },
    Completed {
        message: String,
        result: Box<ScheduleResult>,
    },
    Done,
    Error {
        message: String,
        detail: String,
    },
}

impl ScheduleEvent {
    pub fn status(&self) -> &'static str {
        match self {
            ScheduleEvent::Optimizing { .. } => "optimizing",
            ScheduleEvent::Optimized { .. } => "optimized",
            ScheduleEvent::Processing { .. } => "processing",
            ScheduleEvent::FetchingHours { .. } => "fetching_hours",
            ScheduleEvent::PlaceHoursReady { .. } => "place_hours_ready",
            ScheduleEvent::AiStart { .. } => "ai_start",
            ScheduleEvent::AiProcessingPlace { .. } => "ai_processing_place",
            ScheduleEvent::PlaceScheduled { .. } => "place_scheduled",
            ScheduleEvent::PlaceError { .. } => "place_error",
            ScheduleEvent::GeneratingSummary { .. } => "generating_summary",
            ScheduleEvent::Completed { .. } => "completed",
            ScheduleEvent::Done => "done",
            ScheduleEvent::Error { .. } => "error",
        }
    }

    /// Nothing may be sent after a terminal event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScheduleEvent::Done | ScheduleEvent::Error { .. })
    }

    /// Server-sent-events frame: `data: <json>` followed by a blank line.
    pub fn to_frame(&self) -> String {
        let json = serde_json::to_string(self)
            .unwrap_or_else(|e| encode_failure(self.status(), &e.to_string()));
        format!("data: {}\n\n", json)
    }
}

fn encode_failure(status: &str, detail: &str) -> String {
    serde_json::json!({
        "status": "error",
        "message": format!("failed to encode {} event", status),
        "detail": detail,
    })
    .to_string()
}
