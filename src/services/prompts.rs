//! Prompt text sent to the generative provider. Each prompt ends with the exact
//! JSON shape the matching parser expects.

use chrono::NaiveDate;
use serde_json::json;

use crate::models::place::{Place, PlaceWithHours};
use crate::models::schedule::{ClockTime, StopRecord};
use crate::models::search::PlaceSummary;

const JSON_ONLY: &str = "Return ONLY the JSON object. No markdown, no extra text.";

/// Everything the model needs to schedule one stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopPlan {
    pub order: usize,
    pub total: usize,
    pub suggested_start: ClockTime,
    pub estimated_duration: u32,
    pub travel_time_to_next: u32,
    pub distance_to_next_km: f64,
    pub previous_place: Option<String>,
}

pub fn reorder_prompt(places: &[Place], preference: &str) -> String {
    let listing: Vec<_> = places
        .iter()
        .enumerate()
        .map(|(index, place)| {
            json!({
                "index": index,
                "ref_id": place.ref_id,
                "name": place.name,
                "address": place.address,
                "distance": place.distance,
            })
        })
        .collect();
    let listing = serde_json::to_string_pretty(&listing).unwrap_or_default();

    format!(
        r#"You are a travel planning expert. Reorder the places below so that the visit order:
1. SATISFIES the traveller's request: "{preference}"
2. MINIMISES travel between consecutive places
3. MAKES SENSE for the time of day (no parks in the midday sun, restaurants at meal times)

PLACES:
{listing}

RULES:
- The traveller's request always comes first
- Then shorten the distance between the remaining places
- Briefly explain the ordering
- Use every index exactly once

Return JSON:
{{
    "optimized_order": [0, 1, 2],
    "reasoning": "Short explanation of the ordering",
    "distance_optimized": true,
    "user_preference_applied": true
}}

{JSON_ONLY}"#
    )
}

pub fn stop_prompt(place: &PlaceWithHours, plan: &StopPlan, visit_date: Option<NaiveDate>) -> String {
    let hours = if place.weekday_text.is_empty() {
        "No reliable information".to_string()
    } else {
        place.weekday_text.join("\n")
    };
    let notes = if place.notes.is_empty() {
        "None"
    } else {
        place.notes.as_str()
    };
    let previous = plan
        .previous_place
        .as_deref()
        .map(|name| format!("\n- Previous place: {}", name))
        .unwrap_or_default();
    let date = visit_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "today".to_string());

    let template = json!({
        "order": plan.order,
        "ref_id": place.ref_id,
        "place_name": place.name,
        "address": place.address,
        "start_time": plan.suggested_start.to_string(),
        "end_time": "HH:MM",
        "duration_minutes": plan.estimated_duration,
        "travel_time_to_next": plan.travel_time_to_next,
        "distance_to_next_km": (plan.distance_to_next_km * 100.0).round() / 100.0,
        "notes": "Opening-hours caveats and things to watch out for",
        "recommended_activities": ["Activity 1", "Activity 2", "Activity 3"],
        "is_within_opening_hours": true,
    });
    let template = serde_json::to_string_pretty(&template).unwrap_or_default();

    format!(
        r#"You are a travel itinerary expert. Build the detailed schedule for stop {order}/{total}.

CURRENT PLACE:
- Name: {name}
- Address: {address}
- Distance from the starting point: {distance:.2}km
- Opening hours:
{hours}
- Notes: {notes}{previous}

TRIP:
- Date: {date}
- Suggested start time for this place: {start}
- Position: stop {order}/{total}
- Suggested visit duration: {duration} minutes
- Travel time to the next place: {travel} minutes

IMPORTANT:
1. Times must not overlap with any other stop
2. The start time MUST come after the previous stop's end time
3. Check the opening hours so the place is open
4. Compute travel time PRECISELY
5. Suggest a REASONABLE visit length for this kind of place

Return JSON:
{template}

- start_time = {start}
- end_time = start_time + duration_minutes
- end_time must not collide with the next stop's start_time

{JSON_ONLY}"#,
        order = plan.order,
        total = plan.total,
        name = place.name,
        address = place.address,
        distance = place.distance,
        start = plan.suggested_start,
        duration = plan.estimated_duration,
        travel = plan.travel_time_to_next,
    )
}

pub fn summary_prompt(stops: &[StopRecord]) -> String {
    let schedule = serde_json::to_string_pretty(stops).unwrap_or_default();

    format!(
        r#"Here is the itinerary scheduled for {count} places:

{schedule}

Write a trip summary with:
1. Total expected duration (hours)
2. Estimated end time
3. General recommendations (food, getting around, clothing, weather, confirming opening hours)
4. An alternative ordering, if there is a better one

Return JSON:
{{
    "total_duration_hours": 8.0,
    "estimated_end_time": "17:00",
    "general_recommendations": [
        "Recommendation 1",
        "Recommendation 2",
        "Recommendation 3"
    ],
    "alternative_order": "Description of an alternative ordering, if any"
}}

{JSON_ONLY}"#,
        count = stops.len(),
    )
}

pub fn opening_hours_prompt(place_name: &str, address: &str) -> String {
    let not_found = json!({
        "found": false,
        "place_name": place_name,
        "message": "Opening hours not found",
        "estimated_hours": "08:00 - 17:00 (estimated)",
        "notes": "Call ahead to confirm"
    });
    let not_found = serde_json::to_string_pretty(&not_found).unwrap_or_default();

    format!(
        r#"Look up the following place on Google Maps or other online sources:

Name: {place_name}
Address: {address}

Tasks:
1. Find its opening and closing hours
2. Work out which weekdays it is open
3. Historic sites, museums and parks usually keep standard hours; use them if nothing specific exists
4. If nothing exact is available, estimate from the kind of place

Return exactly this JSON shape:
{{
    "found": true,
    "place_name": "Exact name of the place",
    "opening_hours": {{
        "monday": "08:00 - 17:00",
        "tuesday": "08:00 - 17:00",
        "wednesday": "08:00 - 17:00",
        "thursday": "08:00 - 17:00",
        "friday": "08:00 - 17:00",
        "saturday": "08:00 - 17:00",
        "sunday": "08:00 - 17:00"
    }},
    "is_open_now": true,
    "weekday_text": [
        "Monday: 08:00 - 17:00",
        "Tuesday: 08:00 - 17:00",
        "Wednesday: 08:00 - 17:00",
        "Thursday: 08:00 - 17:00",
        "Friday: 08:00 - 17:00",
        "Saturday: 08:00 - 17:00",
        "Sunday: 08:00 - 17:00"
    ],
    "notes": "Notes about the opening hours, if any",
    "source": "Google Maps / official website / estimate"
}}

If you cannot find it or are unsure, return:
{not_found}

{JSON_ONLY}"#
    )
}

pub fn recommendation_prompt(user_query: &str, places: &[PlaceSummary]) -> String {
    let listing = places
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{}. {} - {} (Distance: {})",
                i + 1,
                p.name.as_deref().unwrap_or("N/A"),
                p.address.as_deref().unwrap_or("N/A"),
                p.distance.unwrap_or(0.0)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a smart travel assistant. The user is looking for: "{user_query}"

Nearby places:
{listing}

Analyse the request and:
1. Pick the 3-5 MOST SUITABLE places
2. Briefly explain why each one fits
3. Rank them by relevance (not necessarily by distance)

Return JSON:
{{
    "analysis": "Short analysis of the request",
    "recommendations": [
        {{
            "rank": 1,
            "place_name": "Place name",
            "reason": "Why it is recommended"
        }}
    ]
}}

{JSON_ONLY}"#
    )
}
