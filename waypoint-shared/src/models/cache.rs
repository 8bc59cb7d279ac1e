use serde::{Deserialize, Serialize};

use super::trip::Trip;

/// The session-cached trip list, stored as a single JSON blob.
///
/// Equality is structural: two entries are equal when every trip and booking
/// field matches, independent of how the JSON keys were ordered on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(default)]
    pub trips: Vec<Trip>,
    /// Trips with something happening today, as selected by the backend.
    #[serde(default)]
    pub today_trips: Vec<Trip>,
}

impl CacheEntry {
    pub fn find_trip(&self, trip_id: &str) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == trip_id)
    }
}
