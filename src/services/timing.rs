//! Travel-time and visit-duration heuristics used to seed each stop's prompt.

const DEFAULT_VISIT_MINUTES: u32 = 60;

/// Keyword buckets, checked in order. The first bucket with a match wins.
const VISIT_DURATION_BUCKETS: &[(&[&str], u32)] = &[
    (&["bảo tàng", "di tích", "museum", "monument"], 90),
    (&["công viên", "vườn", "park", "garden"], 60),
    (&["nhà hàng", "quán", "restaurant", "cafe", "coffee"], 45),
    (&["chùa", "đền", "nhà thờ", "temple", "church", "pagoda"], 45),
    (&["trung tâm", "siêu thị", "mall", "market", "chợ"], 60),
];

/// Minutes of city travel for a distance in kilometres.
pub fn travel_time_minutes(distance_km: f64) -> u32 {
    let distance_km = distance_km.max(0.0);

    if distance_km < 1.0 {
        10
    } else if distance_km < 3.0 {
        15
    } else if distance_km < 5.0 {
        20
    } else if distance_km < 10.0 {
        (distance_km * 5.0).round() as u32
    } else {
        (distance_km * 6.0).round() as u32
    }
}

/// Expected minutes spent at a place, guessed from its name.
pub fn estimate_visit_duration(place_name: &str) -> u32 {
    let name = place_name.to_lowercase();

    VISIT_DURATION_BUCKETS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, minutes)| *minutes)
        .unwrap_or(DEFAULT_VISIT_MINUTES)
}

/// Stand-in for the route distance between consecutive stops: the gap between
/// their distances from the search origin.
pub fn distance_between(current_km: f64, next_km: f64) -> f64 {
    (next_km - current_km).abs()
}
