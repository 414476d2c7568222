use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_VIETMAP_SEARCH_URL: &str = "https://maps.vietmap.vn/api/search/v3";
const DEFAULT_VIETMAP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEARCH_RADIUS_METERS: u32 = 20_000;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 60;
const DEFAULT_STREAM_STEP_DELAY_MS: u64 = 300;

/// Frontend dev servers that are always allowed to call the API.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:3001",
    "http://127.0.0.1:3001",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningHoursMode {
    Static,
    Gemini,
}

impl OpeningHoursMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpeningHoursMode::Static => "static",
            OpeningHoursMode::Gemini => "gemini",
        }
    }
}

impl FromStr for OpeningHoursMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(OpeningHoursMode::Static),
            "gemini" => Ok(OpeningHoursMode::Gemini),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VietmapConfig {
    pub api_key: String,
    pub search_url: String,
    pub timeout: Duration,
    pub radius_meters: u32,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Process-wide settings, resolved once in `main` and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub vietmap: VietmapConfig,
    pub gemini: GeminiConfig,
    pub step_delay: Duration,
    pub opening_hours: OpeningHoursMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", DEFAULT_PORT)?;

        let allowed_origins = allowed_origins(env::var("FRONTEND_ORIGINS").ok().as_deref());

        let vietmap = VietmapConfig {
            api_key: required("VIETMAP_API_KEY")?,
            search_url: env::var("VIETMAP_SEARCH_URL")
                .unwrap_or_else(|_| DEFAULT_VIETMAP_SEARCH_URL.to_string()),
            timeout: Duration::from_secs(parse_or(
                "VIETMAP_TIMEOUT_SECS",
                DEFAULT_VIETMAP_TIMEOUT_SECS,
            )?),
            radius_meters: parse_or("SEARCH_RADIUS_METERS", DEFAULT_SEARCH_RADIUS_METERS)?,
        };

        let gemini = GeminiConfig {
            api_key: required("GEMINI_API_KEY")?,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_or(
                "GEMINI_TIMEOUT_SECS",
                DEFAULT_GEMINI_TIMEOUT_SECS,
            )?),
        };

        let step_delay =
            Duration::from_millis(parse_or("STREAM_STEP_DELAY_MS", DEFAULT_STREAM_STEP_DELAY_MS)?);

        let opening_hours = match env::var("OPENING_HOURS_SOURCE") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "OPENING_HOURS_SOURCE",
                value,
            })?,
            Err(_) => OpeningHoursMode::Static,
        };

        Ok(Self {
            host,
            port,
            allowed_origins,
            vietmap,
            gemini,
            step_delay,
            opening_hours,
        })
    }
}

/// Built-in origins followed by any extra ones from a comma separated list.
pub fn allowed_origins(extra: Option<&str>) -> Vec<String> {
    let mut origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
        .iter()
        .map(|o| o.to_string())
        .collect();

    if let Some(extra) = extra {
        for origin in extra.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            if !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
    }

    origins
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
