use serde::{Deserialize, Serialize};

use super::place::Coordinate;

const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchRequest {
    pub location: Coordinate,
    pub categories: Vec<String>,
}

/// One outbound query against the place search provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub focus: Coordinate,
    pub radius_meters: u32,
    pub category: Option<String>,
}

/// Raw item as returned by the Vietmap search API. Unknown fields are dropped.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProviderPlace {
    pub ref_id: Option<String>,
    pub distance: Option<f64>,
    pub address: Option<String>,
    pub name: Option<String>,
    pub display: Option<String>,
    pub categories: Option<serde_json::Value>,
}

/// Search result sent back to the client.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PlaceSummary {
    pub ref_id: Option<String>,
    pub distance: Option<f64>,
    pub address: Option<String>,
    pub name: Option<String>,
    pub display: Option<String>,
    pub categories: Option<serde_json::Value>,
    pub url: String,
}

impl From<ProviderPlace> for PlaceSummary {
    fn from(place: ProviderPlace) -> Self {
        let url = map_search_url(place.display.as_deref().unwrap_or_default());
        Self {
            ref_id: place.ref_id,
            distance: place.distance,
            address: place.address,
            name: place.name,
            display: place.display,
            categories: place.categories,
            url,
        }
    }
}

pub fn map_search_url(display: &str) -> String {
    let query: String = url::form_urlencoded::byte_serialize(display.as_bytes()).collect();
    format!("{}{}", MAP_SEARCH_URL, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_search_url_encodes_spaces_as_plus() {
        assert_eq!(
            map_search_url("Hoan Kiem Lake"),
            "https://www.google.com/maps/search/?api=1&query=Hoan+Kiem+Lake"
        );
    }

    #[test]
    fn test_map_search_url_escapes_reserved_characters() {
        let url = map_search_url("Bún chả & cà phê");
        assert!(url.contains("%26"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_projection_keeps_fields_and_builds_url() {
        let place = ProviderPlace {
            ref_id: Some("vm:1".to_string()),
            distance: Some(1.2),
            address: Some("1 Trang Tien".to_string()),
            name: Some("Opera House".to_string()),
            display: Some("Opera House Ha Noi".to_string()),
            categories: Some(serde_json::json!(["4001"])),
        };

        let summary = PlaceSummary::from(place);
        assert_eq!(summary.ref_id.as_deref(), Some("vm:1"));
        assert_eq!(summary.distance, Some(1.2));
        assert!(summary.url.ends_with("Opera+House+Ha+Noi"));
    }

    #[test]
    fn test_projection_without_display_yields_empty_query() {
        let summary = PlaceSummary::from(ProviderPlace::default());
        assert_eq!(summary.url, MAP_SEARCH_URL);
    }
}
