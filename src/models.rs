use serde::{Deserialize, Serialize};

/// Prefix used for the location service's namespaced identifiers.
pub const LOCATION_PROVIDER: &str = "sk";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Location {
    pub id: i64,
    pub display_name: String,
    pub state: Option<String>,
    pub country: String,
}

impl Location {
    /// Namespaced external identifier, e.g. `sk:26330`.
    pub fn external_ref(&self) -> String {
        format!("{}:{}", LOCATION_PROVIDER, self.id)
    }

    /// Metro area plus state (if any) and country, as shown to the user.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.display_name, state, self.country),
            None => format!("{}, {}", self.display_name, self.country),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Artist {
    pub spotify_id: String,
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub songkick_id: i64,
    pub songkick_url: String,
    pub display_name: String,
    pub artist: String,
    pub spotify_id: Option<String>,
    pub image_url: Option<String>,
    pub venue_name: String,
    pub venue_lat: f64,
    pub venue_lng: f64,
    pub city: String,
    pub start_date: String,
    pub start_datetime: String,
    pub end_date: Option<String>,
    pub end_datetime: Option<String>,
}
