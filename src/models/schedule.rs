use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::place::{Place, PlaceWithHours};

const CLOCK_FORMAT: &str = "%H:%M";

/// Wall-clock time of day serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn parse(value: &str) -> Option<Self> {
        NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
            .ok()
            .map(Self)
    }

    /// Adds minutes on the clock face. Passing midnight wraps to the next day's time.
    pub fn advance(self, minutes: u32) -> Self {
        let (time, _) = self
            .0
            .overflowing_add_signed(Duration::minutes(i64::from(minutes)));
        Self(time)
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CLOCK_FORMAT))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ClockTime::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("expected HH:MM, got '{}'", raw)))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduleRequest {
    pub places: Vec<Place>,
    #[serde(default, deserialize_with = "clock_or_default")]
    pub start_time: ClockTime,
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    /// Free-text ordering preference, e.g. "lunch at the market, museums in the morning".
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ScheduleRequest {
    pub fn preference(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// One successfully scheduled visit as produced by the generative provider.
///
/// Times are kept as the provider returned them; only `start_time` and
/// `end_time` are required for the entry to be accepted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScheduledStop {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub order: u32,
    #[serde(default)]
    pub ref_id: String,
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub address: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub duration_minutes: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub travel_time_to_next: u32,
    #[serde(default)]
    pub distance_to_next_km: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub recommended_activities: Vec<String>,
    #[serde(default)]
    pub is_within_opening_hours: Option<bool>,
}

/// Stand-in for a stop whose provider response could not be used.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StopError {
    pub order: u32,
    pub ref_id: String,
    pub place_name: String,
    pub error: String,
    pub raw_text: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum StopRecord {
    Scheduled(ScheduledStop),
    Failed(StopError),
}

impl StopRecord {
    pub fn place_name(&self) -> &str {
        match self {
            StopRecord::Scheduled(stop) => &stop.place_name,
            StopRecord::Failed(err) => &err.place_name,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, StopRecord::Scheduled(_))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct OptimizationResult {
    #[serde(default)]
    pub optimized_order: Vec<usize>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_optimized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_preference_applied: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TripSummary {
    pub total_duration_hours: f64,
    pub estimated_end_time: String,
    #[serde(default)]
    pub general_recommendations: Vec<String>,
    #[serde(default)]
    pub alternative_order: String,
}

impl Default for TripSummary {
    fn default() -> Self {
        Self {
            total_duration_hours: 8.0,
            estimated_end_time: "17:00".to_string(),
            general_recommendations: vec![
                "Confirm opening hours before you go".to_string(),
            ],
            alternative_order: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScheduleBody {
    pub schedule: Vec<StopRecord>,
    #[serde(flatten)]
    pub summary: TripSummary,
}

/// Aggregate carried by the `completed` event.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScheduleResult {
    pub success: bool,
    pub visit_date: String,
    pub start_time: ClockTime,
    pub user_prompt: Option<String>,
    pub optimization_applied: Option<OptimizationResult>,
    pub places_count: usize,
    pub places_with_hours_found: usize,
    pub schedule: ScheduleBody,
    pub raw_places_info: Vec<PlaceWithHours>,
}

fn clock_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ClockTime, D::Error> {
    Ok(Option::<ClockTime>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts integers, floats and numeric strings; language models are not consistent about it.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Null => Some(0.0),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n.round() as u32),
        _ => Err(de::Error::custom(format!(
            "expected a non-negative number of minutes, got {}",
            value
        ))),
    }
}
