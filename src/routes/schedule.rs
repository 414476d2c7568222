use actix_web::{http::header, web, HttpResponse};
use log::info;

use crate::models::schedule::ScheduleRequest;
use crate::services::schedule_stream::schedule_event_stream;
use crate::state::AppState;

/*
    /schedule

    Streams `data: {...}` frames until a `done` or `error` frame.
*/
pub async fn create_schedule(
    state: web::Data<AppState>,
    input: web::Json<ScheduleRequest>,
) -> HttpResponse {
    let request = input.into_inner();
    info!(
        "Schedule requested: {} places, start {}, preference: {}",
        request.places.len(),
        request.start_time,
        request.preference().is_some()
    );

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(schedule_event_stream(state.sequencer(), request))
}
