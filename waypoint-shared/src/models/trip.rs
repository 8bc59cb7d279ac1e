use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::booking::{Activity, Booking, BookingKind, Flight, Hotel};

/// Per-language text, e.g. `{"en": "Lisbon", "pt": "Lisboa"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub HashMap<String, String>);

impl LocalizedText {
    pub fn new(lang: &str, text: &str) -> Self {
        let mut map = HashMap::new();
        map.insert(lang.to_string(), text.to_string());
        Self(map)
    }

    /// Text for `lang`, falling back to English, then to the alphabetically
    /// first language present.
    pub fn resolve(&self, lang: &str) -> &str {
        if let Some(text) = self.0.get(lang).or_else(|| self.0.get("en")) {
            return text;
        }

        self.0
            .iter()
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, text)| text.as_str())
            .unwrap_or("")
    }
}

/// A trip as delivered by the backend, with all of its bookings inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    /// Inclusive, `YYYY-MM-DD`
    pub start_date: String,
    /// Inclusive, `YYYY-MM-DD`
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Trip {
    pub fn booking_count(&self, kind: BookingKind) -> usize {
        match kind {
            BookingKind::Flight => self.flights.len(),
            BookingKind::Hotel => self.hotels.len(),
            BookingKind::Activity => self.activities.len(),
        }
    }

    /// Insert the booking, or replace the stored one with the same id.
    pub fn upsert_booking(&mut self, booking: Booking) {
        match booking {
            Booking::Flight(flight) => upsert(&mut self.flights, flight, |f| &f.id),
            Booking::Hotel(hotel) => upsert(&mut self.hotels, hotel, |h| &h.id),
            Booking::Activity(activity) => upsert(&mut self.activities, activity, |a| &a.id),
        }
    }

    /// Returns `true` if a booking was removed.
    pub fn remove_booking(&mut self, kind: BookingKind, booking_id: &str) -> bool {
        match kind {
            BookingKind::Flight => remove(&mut self.flights, booking_id, |f| &f.id),
            BookingKind::Hotel => remove(&mut self.hotels, booking_id, |h| &h.id),
            BookingKind::Activity => remove(&mut self.activities, booking_id, |a| &a.id),
        }
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> &String) {
    match items.iter().position(|existing| id(existing) == id(&item)) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}

fn remove<T>(items: &mut Vec<T>, booking_id: &str, id: impl Fn(&T) -> &String) -> bool {
    let before = items.len();
    items.retain(|item| id(item) != booking_id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_text_fallbacks() {
        let mut title = LocalizedText::new("fr", "Voyage");
        assert_eq!(title.resolve("fr"), "Voyage");
        // No "en" entry, falls through to first language
        assert_eq!(title.resolve("de"), "Voyage");

        title.0.insert("en".to_string(), "Trip".to_string());
        assert_eq!(title.resolve("de"), "Trip");

        assert_eq!(LocalizedText::default().resolve("en"), "");
    }

    #[test]
    fn test_trip_deserializes_without_bookings() {
        let trip: Trip = serde_json::from_str(
            r#"{"id":"t1","title":{"en":"Porto"},"startDate":"2024-06-01","endDate":"2024-06-03"}"#,
        )
        .unwrap();

        assert_eq!(trip.title.resolve("en"), "Porto");
        assert!(trip.flights.is_empty());
        assert!(trip.hotels.is_empty());
        assert!(trip.activities.is_empty());
    }

    #[test]
    fn test_upsert_and_remove_booking() {
        let mut trip: Trip = serde_json::from_str(
            r#"{"id":"t1","startDate":"2024-06-01","endDate":"2024-06-03",
                "activities":[{"id":"a1","name":"Tram 28","date":"2024-06-02"}]}"#,
        )
        .unwrap();

        let mut edited = trip.activities[0].clone();
        edited.name = "Tram 28 (morning)".to_string();
        trip.upsert_booking(Booking::Activity(edited));
        assert_eq!(trip.activities.len(), 1);
        assert_eq!(trip.activities[0].name, "Tram 28 (morning)");

        assert!(trip.remove_booking(BookingKind::Activity, "a1"));
        assert!(!trip.remove_booking(BookingKind::Activity, "a1"));
        assert_eq!(trip.booking_count(BookingKind::Activity), 0);
    }
}
