use serde::{Deserialize, Serialize};

/// Geocoded point carried by an itinerary item. Produced by the places
/// collaborator; the core only ever stores the final address/lat/lng triple.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    /// Placeholder for items seeded from a recommendation. Those arrive
    /// without coordinates and keep this location until the user edits them.
    pub fn unresolved() -> Self {
        Self {
            lat: 0.0,
            lng: 0.0,
            address: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.address.is_empty() || self.lat != 0.0 || self.lng != 0.0
    }
}
