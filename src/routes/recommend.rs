use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde_json::json;

use crate::models::recommendation::RecommendationRequest;
use crate::services::recommendation_service::recommend_places;
use crate::state::AppState;

/*
    /recommend
*/
pub async fn recommend(
    state: web::Data<AppState>,
    input: web::Json<RecommendationRequest>,
) -> impl Responder {
    let request = input.into_inner();
    if request.user_query.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "detail": "user_query must not be empty" }));
    }

    match recommend_places(
        state.search.as_ref(),
        state.generator.as_ref(),
        &request,
        state.config.vietmap.radius_meters,
    )
    .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            error!("Recommendation search failed: {}", err);
            HttpResponse::InternalServerError().json(json!({
                "detail": format!("Error calling Vietmap API: {}", err)
            }))
        }
    }
}
