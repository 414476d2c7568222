use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// `lat,lng` as the search provider expects it in query strings.
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// A place chosen by the client for scheduling. `distance` is kilometres from the origin.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Place {
    pub ref_id: String,
    pub name: String,
    pub address: String,
    pub distance: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WeeklyHours {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

impl WeeklyHours {
    pub fn uniform(hours: &str) -> Self {
        Self {
            monday: hours.to_string(),
            tuesday: hours.to_string(),
            wednesday: hours.to_string(),
            thursday: hours.to_string(),
            friday: hours.to_string(),
            saturday: hours.to_string(),
            sunday: hours.to_string(),
        }
    }

    /// One human readable line per weekday, Monday first.
    pub fn weekday_text(&self) -> Vec<String> {
        [
            ("Monday", &self.monday),
            ("Tuesday", &self.tuesday),
            ("Wednesday", &self.wednesday),
            ("Thursday", &self.thursday),
            ("Friday", &self.friday),
            ("Saturday", &self.saturday),
            ("Sunday", &self.sunday),
        ]
        .iter()
        .map(|(day, hours)| format!("{}: {}", day, hours))
        .collect()
    }
}

/// A place enriched with whatever opening-hours information could be found.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlaceWithHours {
    pub ref_id: String,
    pub name: String,
    pub address: String,
    pub distance: f64,
    pub found: bool,
    pub opening_hours: Option<WeeklyHours>,
    pub is_open_now: Option<bool>,
    pub weekday_text: Vec<String>,
    pub notes: String,
    pub source: String,
}

impl PlaceWithHours {
    pub fn new(place: &Place, hours: OpeningHours) -> Self {
        Self {
            ref_id: place.ref_id.clone(),
            name: place.name.clone(),
            address: place.address.clone(),
            distance: place.distance,
            found: hours.found,
            opening_hours: hours.opening_hours,
            is_open_now: hours.is_open_now,
            weekday_text: hours.weekday_text,
            notes: hours.notes,
            source: hours.source,
        }
    }
}

/// Opening-hours lookup result for a single place.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningHours {
    pub found: bool,
    pub opening_hours: Option<WeeklyHours>,
    pub is_open_now: Option<bool>,
    pub weekday_text: Vec<String>,
    pub notes: String,
    pub source: String,
}
