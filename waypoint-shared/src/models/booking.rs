use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    #[serde(default)]
    pub city: String,
    /// IATA code
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    /// Departure date, `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub departure_time: String,
    /// `HH:MM`, on `date + 1` when `arrival_next_day` is set
    pub arrival_time: String,
    #[serde(default)]
    pub arrival_next_day: bool,
    #[serde(default)]
    pub departure: Airport,
    #[serde(default)]
    pub arrival: Airport,
    #[serde(default)]
    pub flight_number: String,
    #[serde(default)]
    pub booking_reference: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passengers: Vec<String>,
}

/// One end of a hotel stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayPoint {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// A hotel stay. Nights run over `[check_in.date, check_out.date)`.
///
/// Both ends are optional so that a half-filled record from the backend still
/// deserializes; the itinerary logic skips it instead of failing the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<StayPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<StayPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Flight,
    Hotel,
    Activity,
}

impl BookingKind {
    /// Path segment used by the backend, e.g. `flights`
    pub fn collection(&self) -> &'static str {
        match self {
            BookingKind::Flight => "flights",
            BookingKind::Hotel => "hotels",
            BookingKind::Activity => "activities",
        }
    }
}

impl fmt::Display for BookingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingKind::Flight => "flight",
            BookingKind::Hotel => "hotel",
            BookingKind::Activity => "activity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Booking {
    Flight(Flight),
    Hotel(Hotel),
    Activity(Activity),
}

impl Booking {
    pub fn kind(&self) -> BookingKind {
        match self {
            Booking::Flight(_) => BookingKind::Flight,
            Booking::Hotel(_) => BookingKind::Hotel,
            Booking::Activity(_) => BookingKind::Activity,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Booking::Flight(f) => &f.id,
            Booking::Hotel(h) => &h.id,
            Booking::Activity(a) => &a.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_without_check_out_still_parses() {
        let hotel: Hotel = serde_json::from_str(
            r#"{"id":"h1","name":"Casa","checkIn":{"date":"2024-06-01","time":"15:00"}}"#,
        )
        .unwrap();

        assert_eq!(hotel.check_in.unwrap().time.as_deref(), Some("15:00"));
        assert!(hotel.check_out.is_none());
    }

    #[test]
    fn test_flight_wire_names() {
        let flight: Flight = serde_json::from_str(
            r#"{"id":"f1","date":"2024-06-02","departureTime":"23:50","arrivalTime":"01:20",
                "arrivalNextDay":true,"departure":{"city":"Lisbon","code":"LIS"},
                "arrival":{"city":"Paris","code":"CDG","terminal":"2E"},
                "flightNumber":"TP440","bookingReference":"ABC123"}"#,
        )
        .unwrap();

        assert!(flight.arrival_next_day);
        assert_eq!(flight.arrival.terminal.as_deref(), Some("2E"));
        assert_eq!(flight.flight_number, "TP440");
    }

    #[test]
    fn test_booking_tagging() {
        let json = r#"{"kind":"activity","data":{"id":"a1","name":"Museum","date":"2024-06-02"}}"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.kind(), BookingKind::Activity);
        assert_eq!(booking.id(), "a1");
        assert_eq!(BookingKind::Activity.collection(), "activities");
    }
}
