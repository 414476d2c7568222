use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    opening_hours_source: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let config = &state.config;
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        opening_hours_source: config.opening_hours.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let vietmap = check_key("Vietmap", &config.vietmap.api_key);
    let gemini = check_key("Gemini", &config.gemini.api_key);

    if vietmap.status != "ok" || gemini.status != "ok" {
        health.status = "degraded".to_string();
    }

    health.services.insert("vietmap".to_string(), vietmap);
    health.services.insert("gemini".to_string(), gemini);

    HttpResponse::Ok().json(health)
}

fn check_key(service: &str, key: &str) -> ServiceStatus {
    if key.trim().is_empty() {
        return ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("{} API key not configured", service)),
        };
    }

    ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!("{} API key configured ({})", service, mask_key(key))),
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    } else {
        "***".to_string()
    }
}
