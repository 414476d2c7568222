use actix_web::{error, web, HttpResponse};
use serde_json::json;

pub mod health;
pub mod recommend;
pub mod schedule;
pub mod search;

/// Route table shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "detail": detail })),
        )
        .into()
    }))
    .route("/health", web::get().to(health::health_check))
    .route("/search", web::post().to(search::search))
    .route("/schedule", web::post().to(schedule::create_schedule))
    .route("/recommend", web::post().to(recommend::recommend));
}
