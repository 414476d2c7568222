use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use vietmap_trip_api::config::{GeminiConfig, VietmapConfig};
use vietmap_trip_api::models::place::Coordinate;
use vietmap_trip_api::models::search::SearchQuery;
use vietmap_trip_api::services::gemini_service::GeminiService;
use vietmap_trip_api::services::providers::{
    GenerationError, PlaceSearchProvider, SearchError, TextGenerator,
};
use vietmap_trip_api::services::vietmap_service::VietmapService;

/// Echoes the query string back as a single search result.
async fn vietmap_ok(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    HttpResponse::Ok().json(json!([
        {
            "ref_id": "echo",
            "name": query.get("text"),
            "address": query.get("apikey"),
            "display": format!(
                "{}|{}|{}|{}",
                query.get("focus").cloned().unwrap_or_default(),
                query.get("circle_center").cloned().unwrap_or_default(),
                query.get("circle_radius").cloned().unwrap_or_default(),
                query.get("cats").cloned().unwrap_or_default(),
            ),
            "distance": 0.7,
        },
        { "ref_id": 12 },
    ]))
}

async fn vietmap_unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().body("invalid apikey")
}

async fn vietmap_object() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "code": "NO_RESULT" }))
}

async fn gemini(req: HttpRequest, path: web::Path<String>, body: web::Json<serde_json::Value>) -> HttpResponse {
    let key = req
        .headers()
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if key != "gemini-key" {
        return HttpResponse::Forbidden().json(json!({ "error": { "message": "API key not valid" } }));
    }

    match path.as_str() {
        "test-model:generateContent" => {
            let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
            HttpResponse::Ok().json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "echo: " }, { "text": prompt }] }
                }]
            }))
        }
        "empty-model:generateContent" => HttpResponse::Ok().json(json!({ "candidates": [] })),
        _ => HttpResponse::TooManyRequests()
            .json(json!({ "error": { "code": 429, "message": "Resource exhausted" } })),
    }
}

fn start_stub_server() -> SocketAddr {
    let server = HttpServer::new(|| {
        App::new()
            .route("/search/ok", web::get().to(vietmap_ok))
            .route("/search/unauthorized", web::get().to(vietmap_unauthorized))
            .route("/search/object", web::get().to(vietmap_object))
            .route("/models/{call}", web::post().to(gemini))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    addr
}

fn vietmap(addr: SocketAddr, path: &str) -> VietmapService {
    VietmapService::new(&VietmapConfig {
        api_key: "vietmap-key".to_string(),
        search_url: format!("http://{}/search/{}", addr, path),
        timeout: Duration::from_secs(5),
        radius_meters: 20_000,
    })
    .unwrap()
}

fn gemini_client(addr: SocketAddr, model: &str, api_key: &str) -> GeminiService {
    GeminiService::new(&GeminiConfig {
        api_key: api_key.to_string(),
        model: model.to_string(),
        base_url: format!("http://{}/", addr),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn query(category: Option<&str>) -> SearchQuery {
    SearchQuery {
        text: "Khu Ăn Uống".to_string(),
        focus: Coordinate {
            lat: 21.0285,
            lng: 105.8542,
        },
        radius_meters: 20_000,
        category: category.map(str::to_string),
    }
}

#[actix_rt::test]
async fn test_vietmap_sends_search_parameters() {
    let addr = start_stub_server();
    let results = vietmap(addr, "ok").search(&query(Some("1003"))).await.unwrap();

    // The second item has a numeric ref_id and is skipped.
    assert_eq!(results.len(), 1);
    let place = &results[0];
    assert_eq!(place.name.as_deref(), Some("Khu Ăn Uống"));
    assert_eq!(place.address.as_deref(), Some("vietmap-key"));
    assert_eq!(
        place.display.as_deref(),
        Some("21.0285,105.8542|21.0285,105.8542|20000|1003")
    );
}

#[actix_rt::test]
async fn test_vietmap_omits_category_when_absent() {
    let addr = start_stub_server();
    let results = vietmap(addr, "ok").search(&query(None)).await.unwrap();
    assert!(results[0].display.as_deref().unwrap().ends_with("|20000|"));
}

#[actix_rt::test]
async fn test_vietmap_error_status() {
    let addr = start_stub_server();
    let err = vietmap(addr, "unauthorized")
        .search(&query(None))
        .await
        .unwrap_err();

    match err {
        SearchError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid apikey");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[actix_rt::test]
async fn test_vietmap_non_list_body_is_empty() {
    let addr = start_stub_server();
    let results = vietmap(addr, "object").search(&query(None)).await.unwrap();
    assert!(results.is_empty());
}

#[actix_rt::test]
async fn test_gemini_joins_candidate_parts() {
    let addr = start_stub_server();
    let text = gemini_client(addr, "test-model", "gemini-key")
        .generate("plan my day")
        .await
        .unwrap();
    assert_eq!(text, "echo: plan my day");
}

#[actix_rt::test]
async fn test_gemini_api_error_message() {
    let addr = start_stub_server();
    let err = gemini_client(addr, "busy-model", "gemini-key")
        .generate("plan my day")
        .await
        .unwrap_err();

    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Resource exhausted");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[actix_rt::test]
async fn test_gemini_rejected_key() {
    let addr = start_stub_server();
    let err = gemini_client(addr, "test-model", "wrong")
        .generate("plan my day")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Api { status: 403, .. }));
}

#[actix_rt::test]
async fn test_gemini_without_candidates_is_empty_response() {
    let addr = start_stub_server();
    let err = gemini_client(addr, "empty-model", "gemini-key")
        .generate("plan my day")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
}
