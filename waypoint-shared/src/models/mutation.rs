use serde::{Deserialize, Serialize};

use super::booking::{Booking, BookingKind};
use super::trip::LocalizedText;

/// A user edit that the backend persists. Every mutation invalidates the
/// session cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TripMutation {
    #[serde(rename_all = "camelCase")]
    RenameTrip { trip_id: String, title: LocalizedText },
    #[serde(rename_all = "camelCase")]
    DeleteTrip { trip_id: String },
    #[serde(rename_all = "camelCase")]
    AddBooking { trip_id: String, booking: Booking },
    #[serde(rename_all = "camelCase")]
    EditBooking { trip_id: String, booking: Booking },
    #[serde(rename_all = "camelCase")]
    DeleteBooking {
        trip_id: String,
        kind: BookingKind,
        booking_id: String,
    },
}

impl TripMutation {
    pub fn trip_id(&self) -> &str {
        match self {
            TripMutation::RenameTrip { trip_id, .. }
            | TripMutation::DeleteTrip { trip_id }
            | TripMutation::AddBooking { trip_id, .. }
            | TripMutation::EditBooking { trip_id, .. }
            | TripMutation::DeleteBooking { trip_id, .. } => trip_id,
        }
    }

    /// The booking kind this mutation touches, if it touches one.
    pub fn affected_kind(&self) -> Option<BookingKind> {
        match self {
            TripMutation::AddBooking { booking, .. } | TripMutation::EditBooking { booking, .. } => {
                Some(booking.kind())
            }
            TripMutation::DeleteBooking { kind, .. } => Some(*kind),
            TripMutation::RenameTrip { .. } | TripMutation::DeleteTrip { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affected_kind() {
        let delete: TripMutation = serde_json::from_str(
            r#"{"op":"delete_booking","tripId":"t1","kind":"hotel","bookingId":"h1"}"#,
        )
        .unwrap();
        assert_eq!(delete.trip_id(), "t1");
        assert_eq!(delete.affected_kind(), Some(BookingKind::Hotel));

        let rename = TripMutation::RenameTrip {
            trip_id: "t1".to_string(),
            title: LocalizedText::new("en", "Summer"),
        };
        assert_eq!(rename.affected_kind(), None);
    }
}
