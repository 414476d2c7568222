use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde_json::json;

use crate::models::search::SearchRequest;
use crate::services::place_search_service::{search_places, PlaceSearchError};
use crate::state::AppState;

/*
    /search
*/
pub async fn search(state: web::Data<AppState>, input: web::Json<SearchRequest>) -> impl Responder {
    let request = input.into_inner();

    match search_places(
        state.search.as_ref(),
        &request,
        state.config.vietmap.radius_meters,
    )
    .await
    {
        Ok(places) => HttpResponse::Ok().json(places),
        Err(PlaceSearchError::NoKeywords) => HttpResponse::BadRequest().json(json!({
            "detail": "No keywords found for the given categories"
        })),
        Err(PlaceSearchError::Provider(err)) => {
            error!("Vietmap search failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "detail": format!("Error calling Vietmap API: {}", err)
            }))
        }
    }
}
