mod common;

use actix_web::{http::StatusCode, test};
use serde_json::json;

use common::{provider_place, FakeSearch, ScriptedGenerator, TestApp};
use vietmap_trip_api::services::providers::GenerationError;

fn cafes() -> FakeSearch {
    FakeSearch::new().with(
        "",
        vec![
            provider_place("a", "Cong Caphe", 0.4),
            provider_place("b", "Cafe Giang", 0.9),
            provider_place("a", "Cong Caphe", 0.4),
            provider_place("c", "Loading T", 1.5),
        ],
    )
}

fn request(max_results: usize) -> serde_json::Value {
    json!({
        "location": { "lat": 21.0285, "lng": 105.8542 },
        "user_query": "a quiet cafe to read",
        "max_results": max_results,
    })
}

#[actix_rt::test]
async fn test_recommend_returns_ranked_places() {
    let generator = ScriptedGenerator::new(vec![Ok(json!({
        "analysis": "Quiet spots close to the lake",
        "recommendations": [
            { "rank": 1, "place_name": "Loading T", "reason": "Colonial house, few tourists" },
            { "rank": 2, "place_name": "Cafe Giang", "reason": "Famous egg coffee" },
        ],
    })
    .to_string())]);
    let test_app = TestApp::new(cafes(), generator);
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/recommend")
        .set_json(request(5))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ai_enabled"], true);
    assert_eq!(body["recommendations"][0]["place_name"], "Loading T");
    assert_eq!(body["raw_places"].as_array().unwrap().len(), 3);

    let queries = test_app.search.queries();
    assert_eq!(queries[0].text, "a quiet cafe to read");
    assert!(queries[0].category.is_none());
    assert!(test_app.generator.prompts()[0].contains("Cafe Giang"));
}

#[actix_rt::test]
async fn test_recommend_falls_back_to_nearest_places() {
    let generator = ScriptedGenerator::new(vec![Err(GenerationError::EmptyResponse)]);
    let test_app = TestApp::new(cafes(), generator);
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/recommend")
        .set_json(request(2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
    let names: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cong Caphe", "Cafe Giang"]);
}

#[actix_rt::test]
async fn test_recommend_requires_query() {
    let test_app = TestApp::new(cafes(), ScriptedGenerator::default());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/recommend")
        .set_json(json!({
            "location": { "lat": 21.0285, "lng": 105.8542 },
            "user_query": "   ",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(test_app.search.queries().is_empty());
}

#[actix_rt::test]
async fn test_recommend_search_failure_is_server_error() {
    let test_app = TestApp::new(FakeSearch::failing(), ScriptedGenerator::default());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/recommend")
        .set_json(request(5))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
