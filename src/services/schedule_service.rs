//! Itinerary sequencer.
//!
//! Builds a day trip one stop at a time:
//! - optionally reorders the places from a free-text preference
//! - enriches every place with opening hours
//! - schedules each stop with its own generation call, seeding the prompt with the
//!   previous stop's end time and travel time
//! - asks for a trip summary once every stop has a record
//!
//! Provider content failures never abort the run (reorder falls back to the
//! original order, a bad stop becomes an error record, a bad summary becomes the
//! default summary). Only transport failures on stop/summary calls and a
//! disconnected client end it early.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::channel::mpsc::Sender;
use futures::SinkExt;
use log::{debug, info, warn};
use thiserror::Error;

use crate::models::events::ScheduleEvent;
use crate::models::place::{Place, PlaceWithHours};
use crate::models::schedule::{
    ClockTime, OptimizationResult, ScheduleBody, ScheduleRequest, ScheduleResult, ScheduledStop,
    StopError, StopRecord, TripSummary,
};
use crate::services::ai_parsing::parse_ai_json;
use crate::services::opening_hours_service::OpeningHoursSource;
use crate::services::prompts::{reorder_prompt, stop_prompt, summary_prompt, StopPlan};
use crate::services::providers::{GenerationError, TextGenerator};
use crate::services::timing::{distance_between, estimate_visit_duration, travel_time_minutes};

pub type EventSink = Sender<ScheduleEvent>;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("client disconnected")]
    Disconnected,
    #[error("{stage} generation failed: {source}")]
    Generation {
        stage: &'static str,
        #[source]
        source: GenerationError,
    },
}

/// Schedule built so far. Each new stop is planned from the last recorded one.
#[derive(Debug, Clone)]
pub struct Itinerary {
    start_time: ClockTime,
    stops: Vec<StopRecord>,
}

impl Itinerary {
    pub fn new(start_time: ClockTime) -> Self {
        Self {
            start_time,
            stops: Vec::new(),
        }
    }

    /// Previous stop's end time plus its travel time, or the trip start when
    /// there is no usable previous stop.
    pub fn next_start(&self) -> ClockTime {
        match self.stops.last() {
            Some(StopRecord::Scheduled(stop)) => ClockTime::parse(&stop.end_time)
                .map(|end| end.advance(stop.travel_time_to_next))
                .unwrap_or(self.start_time),
            Some(StopRecord::Failed(_)) | None => self.start_time,
        }
    }

    /// Plans the stop at `index` (0-based) of `places`.
    pub fn plan(&self, places: &[PlaceWithHours], index: usize) -> StopPlan {
        let place = &places[index];
        let next = places.get(index + 1);

        let distance_to_next_km = next
            .map(|n| distance_between(place.distance, n.distance))
            .unwrap_or(0.0);
        let travel_time_to_next = if next.is_some() {
            travel_time_minutes(distance_to_next_km)
        } else {
            0
        };

        StopPlan {
            order: index + 1,
            total: places.len(),
            suggested_start: self.next_start(),
            estimated_duration: estimate_visit_duration(&place.name),
            travel_time_to_next,
            distance_to_next_km,
            previous_place: self.stops.last().map(|s| s.place_name().to_string()),
        }
    }

    pub fn record(&mut self, stop: StopRecord) {
        self.stops.push(stop);
    }

    pub fn stops(&self) -> &[StopRecord] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<StopRecord> {
        self.stops
    }
}

/// Turns the provider's answer for one stop into a record.
pub fn resolve_stop(text: &str, place: &PlaceWithHours, order: usize) -> StopRecord {
    match parse_ai_json::<ScheduledStop>(text) {
        Ok(stop) => StopRecord::Scheduled(stop),
        Err(e) => StopRecord::Failed(StopError {
            order: order as u32,
            ref_id: place.ref_id.clone(),
            place_name: place.name.clone(),
            error: format!("JSON parse error: {}", e),
            raw_text: e.raw_text().to_string(),
        }),
    }
}

/// Applies a model-proposed ordering. The order must be a permutation of `0..places.len()`.
pub fn apply_permutation(places: &[Place], order: &[usize]) -> Result<Vec<Place>, String> {
    if order.len() != places.len() {
        return Err(format!(
            "expected {} indices, got {}",
            places.len(),
            order.len()
        ));
    }

    let mut seen = HashSet::with_capacity(order.len());
    for &index in order {
        if index >= places.len() {
            return Err(format!("index {} is out of range", index));
        }
        if !seen.insert(index) {
            return Err(format!("index {} appears more than once", index));
        }
    }

    Ok(order.iter().map(|&i| places[i].clone()).collect())
}

#[derive(Clone)]
pub struct ScheduleSequencer {
    generator: Arc<dyn TextGenerator>,
    hours: Arc<dyn OpeningHoursSource>,
    step_delay: Duration,
}

impl ScheduleSequencer {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        hours: Arc<dyn OpeningHoursSource>,
        step_delay: Duration,
    ) -> Self {
        Self {
            generator,
            hours,
            step_delay,
        }
    }

    /// Runs the whole pipeline, pushing progress events into `sink`.
    /// The `completed`/`done` pair is left to the caller.
    pub async fn run(
        &self,
        request: &ScheduleRequest,
        sink: &mut EventSink,
    ) -> Result<ScheduleResult, ScheduleError> {
        let (places, optimization) = match request.preference() {
            Some(preference) => {
                emit(
                    sink,
                    ScheduleEvent::Optimizing {
                        message: format!("Optimizing visit order for: {}", preference),
                    },
                )
                .await?;
                self.pace().await;

                let (places, optimization) = self.reorder(&request.places, preference).await;

                emit(
                    sink,
                    ScheduleEvent::Optimized {
                        message: "Visit order optimized".to_string(),
                        optimization: optimization.clone(),
                    },
                )
                .await?;
                self.pace().await;

                (places, Some(optimization))
            }
            None => (request.places.clone(), None),
        };

        emit(
            sink,
            ScheduleEvent::Processing {
                message: "Starting the visit schedule...".to_string(),
            },
        )
        .await?;
        self.pace().await;

        let places = self.fetch_hours(&places, sink).await?;
        let total = places.len();

        emit(
            sink,
            ScheduleEvent::AiStart {
                message: format!("Scheduling {} places...", total),
                total_places: total,
            },
        )
        .await?;
        self.pace().await;

        let mut itinerary = Itinerary::new(request.start_time);
        for (index, place) in places.iter().enumerate() {
            let progress = index + 1;
            emit(
                sink,
                ScheduleEvent::AiProcessingPlace {
                    place: place.name.clone(),
                    message: format!("Scheduling {} ({}/{})", place.name, progress, total),
                    progress,
                    total,
                },
            )
            .await?;

            let plan = itinerary.plan(&places, index);
            debug!(
                "Stop {}/{} '{}' suggested start {}",
                progress, total, place.name, plan.suggested_start
            );

            let text = self
                .generator
                .generate(&stop_prompt(place, &plan, request.visit_date))
                .await
                .map_err(|source| ScheduleError::Generation {
                    stage: "stop",
                    source,
                })?;

            let record = resolve_stop(&text, place, plan.order);
            let event = match &record {
                StopRecord::Scheduled(stop) => ScheduleEvent::PlaceScheduled {
                    place: place.name.clone(),
                    data: stop.clone(),
                    progress,
                    total,
                },
                StopRecord::Failed(failure) => {
                    warn!("Stop {} ({}) unusable: {}", progress, place.name, failure.error);
                    ScheduleEvent::PlaceError {
                        place: place.name.clone(),
                        error: failure.error.clone(),
                        progress,
                        total,
                    }
                }
            };
            itinerary.record(record);
            emit(sink, event).await?;
            self.pace().await;
        }

        let scheduled = itinerary.stops().iter().filter(|s| s.is_scheduled()).count();
        info!("Scheduled {}/{} stops", scheduled, total);

        emit(
            sink,
            ScheduleEvent::GeneratingSummary {
                message: "Writing the trip summary...".to_string(),
            },
        )
        .await?;

        let summary = self.summarize(itinerary.stops()).await?;
        let places_with_hours_found = places.iter().filter(|p| p.found).count();

        Ok(ScheduleResult {
            success: true,
            visit_date: request
                .visit_date
                .unwrap_or_else(|| Local::now().date_naive())
                .format("%Y-%m-%d")
                .to_string(),
            start_time: request.start_time,
            user_prompt: request.prompt.clone(),
            optimization_applied: optimization,
            places_count: request.places.len(),
            places_with_hours_found,
            schedule: ScheduleBody {
                schedule: itinerary.into_stops(),
                summary,
            },
            raw_places_info: places,
        })
    }

    /// Reorders `places` per the preference. Any failure keeps the original order
    /// and is reported in the returned result instead.
    pub async fn reorder(&self, places: &[Place], preference: &str) -> (Vec<Place>, OptimizationResult) {
        let attempt = async {
            let text = self
                .generator
                .generate(&reorder_prompt(places, preference))
                .await
                .map_err(|e| e.to_string())?;
            let mut result =
                parse_ai_json::<OptimizationResult>(&text).map_err(|e| e.to_string())?;
            if result.optimized_order.is_empty() {
                result.optimized_order = (0..places.len()).collect();
            }
            let reordered = apply_permutation(places, &result.optimized_order)
                .map_err(|e| format!("invalid visit order: {}", e))?;
            Ok::<_, String>((reordered, result))
        };

        match attempt.await {
            Ok((reordered, result)) => {
                info!("Applied visit order {:?}", result.optimized_order);
                (reordered, result)
            }
            Err(error) => {
                warn!("Keeping original visit order: {}", error);
                (
                    places.to_vec(),
                    OptimizationResult {
                        optimized_order: (0..places.len()).collect(),
                        reasoning: "Kept the original order because optimization failed".to_string(),
                        error: Some(error),
                        ..Default::default()
                    },
                )
            }
        }
    }

    async fn fetch_hours(
        &self,
        places: &[Place],
        sink: &mut EventSink,
    ) -> Result<Vec<PlaceWithHours>, ScheduleError> {
        let total = places.len();
        let mut enriched = Vec::with_capacity(total);

        for (index, place) in places.iter().enumerate() {
            let progress = index + 1;
            emit(
                sink,
                ScheduleEvent::FetchingHours {
                    place: place.name.clone(),
                    message: format!(
                        "Fetching opening hours for {} ({}/{})...",
                        place.name, progress, total
                    ),
                    progress,
                    total,
                },
            )
            .await?;

            let hours = self.hours.lookup(place).await;
            let info = PlaceWithHours::new(place, hours);
            emit(sink, ScheduleEvent::PlaceHoursReady { data: info.clone() }).await?;
            enriched.push(info);
            self.pace().await;
        }

        Ok(enriched)
    }

    async fn summarize(&self, stops: &[StopRecord]) -> Result<TripSummary, ScheduleError> {
        let text = self
            .generator
            .generate(&summary_prompt(stops))
            .await
            .map_err(|source| ScheduleError::Generation {
                stage: "summary",
                source,
            })?;

        Ok(parse_ai_json::<TripSummary>(&text).unwrap_or_else(|e| {
            warn!("Using default trip summary: {}", e);
            TripSummary::default()
        }))
    }

    async fn pace(&self) {
        if !self.step_delay.is_zero() {
            tokio::time::sleep(self.step_delay).await;
        }
    }
}

async fn emit(sink: &mut EventSink, event: ScheduleEvent) -> Result<(), ScheduleError> {
    sink.send(event)
        .await
        .map_err(|_| ScheduleError::Disconnected)
}
