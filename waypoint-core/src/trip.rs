//! Trip-level classification used by the trip list.

use chrono::NaiveDate;
use serde::Serialize;
use waypoint_shared::{Hotel, Trip};

use crate::clock::parse_date;
use crate::{CoreError, CoreResult};

const PALETTE: [&str; 8] = [
    "#2563eb", "#db2777", "#059669", "#d97706", "#7c3aed", "#0891b2", "#dc2626", "#4d7c0f",
];

/// Stable accent color for a trip, derived from its id.
pub fn trip_color(trip_id: &str) -> &'static str {
    let hash = trip_id
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    PALETTE[hash as usize % PALETTE.len()]
}

/// Longest trip or stay, in days, that gets expanded day by day.
pub const MAX_SPAN_DAYS: i64 = 3660;

/// Check-in and check-out dates of a stay. Fails for a missing end, a
/// check-out before check-in, or a stay longer than [`MAX_SPAN_DAYS`].
pub fn stay_dates(hotel: &Hotel) -> CoreResult<(NaiveDate, NaiveDate)> {
    let malformed = |reason: &str| CoreError::MalformedBooking {
        id: hotel.id.clone(),
        reason: reason.to_string(),
    };

    let check_in = hotel.check_in.as_ref().ok_or_else(|| malformed("missing checkIn"))?;
    let check_out = hotel.check_out.as_ref().ok_or_else(|| malformed("missing checkOut"))?;

    let check_in = parse_date(&check_in.date)?;
    let check_out = parse_date(&check_out.date)?;
    if check_out < check_in {
        return Err(malformed("checkOut before checkIn"));
    }
    if (check_out - check_in).num_days() > MAX_SPAN_DAYS {
        return Err(malformed("stay too long"));
    }

    Ok((check_in, check_out))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TripPhase {
    Upcoming,
    Ongoing,
    Past,
}

/// A trip is past once its last day is strictly before today. Unparseable
/// bounds never count as past.
pub fn is_trip_past(trip: &Trip, today: NaiveDate) -> bool {
    parse_date(&trip.end_date).is_ok_and(|end| end < today)
}

pub fn phase(trip: &Trip, today: NaiveDate) -> TripPhase {
    if is_trip_past(trip, today) {
        return TripPhase::Past;
    }
    match parse_date(&trip.start_date) {
        Ok(start) if start <= today => TripPhase::Ongoing,
        _ => TripPhase::Upcoming,
    }
}

/// Orders trips for the list: ongoing first, then upcoming soonest-first, then
/// past most-recent-first.
pub fn sort_for_display(trips: &mut [Trip], today: NaiveDate) {
    fn rank(phase: TripPhase) -> u8 {
        match phase {
            TripPhase::Ongoing => 0,
            TripPhase::Upcoming => 1,
            TripPhase::Past => 2,
        }
    }

    trips.sort_by(|a, b| {
        let (pa, pb) = (phase(a, today), phase(b, today));
        rank(pa).cmp(&rank(pb)).then_with(|| match pa {
            TripPhase::Past => b.end_date.cmp(&a.end_date),
            _ => a.start_date.cmp(&b.start_date),
        })
    });
}

/// Counts shown on a trip card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripSummary {
    pub nights: i64,
    pub flights: usize,
    pub hotels: usize,
    pub activities: usize,
}

impl TripSummary {
    pub fn of(trip: &Trip) -> Self {
        let nights = match (parse_date(&trip.start_date), parse_date(&trip.end_date)) {
            (Ok(start), Ok(end)) => (end - start).num_days().max(0),
            _ => 0,
        };

        Self {
            nights,
            flights: trip.flights.len(),
            hotels: trip.hotels.len(),
            activities: trip.activities.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_shared::LocalizedText;

    fn trip(id: &str, start: &str, end: &str) -> Trip {
        Trip {
            id: id.to_string(),
            title: LocalizedText::new("en", id),
            start_date: start.to_string(),
            end_date: end.to_string(),
            cover_photo: None,
            flights: Vec::new(),
            hotels: Vec::new(),
            activities: Vec::new(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_is_trip_past_compares_end_date() {
        let t = trip("t", "2024-06-01", "2024-06-03");
        assert!(!is_trip_past(&t, day("2024-06-03")));
        assert!(is_trip_past(&t, day("2024-06-04")));
        assert!(!is_trip_past(&trip("bad", "x", "y"), day("2024-06-04")));
    }

    #[test]
    fn test_phase_and_display_order() {
        let today = day("2024-06-10");
        let mut trips = vec![
            trip("old", "2024-01-01", "2024-01-05"),
            trip("later", "2024-09-01", "2024-09-05"),
            trip("recent", "2024-05-01", "2024-05-05"),
            trip("now", "2024-06-08", "2024-06-12"),
            trip("soon", "2024-07-01", "2024-07-03"),
        ];

        assert_eq!(phase(&trips[3], today), TripPhase::Ongoing);
        sort_for_display(&mut trips, today);

        let ids: Vec<&str> = trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["now", "soon", "later", "recent", "old"]);
    }

    #[test]
    fn test_summary_nights() {
        let mut t = trip("t", "2024-06-01", "2024-06-04");
        t.hotels.push(Hotel {
            id: "h".to_string(),
            name: "H".to_string(),
            check_in: None,
            check_out: None,
            address: None,
            guests: None,
            confirmation_number: None,
        });

        let summary = TripSummary::of(&t);
        assert_eq!(summary.nights, 3);
        assert_eq!(summary.hotels, 1);
        assert_eq!(summary.flights, 0);
    }

    #[test]
    fn test_stay_dates_rejects_inverted_range() {
        let hotel = Hotel {
            id: "h".to_string(),
            name: "H".to_string(),
            check_in: Some(waypoint_shared::StayPoint { date: "2024-06-05".to_string(), time: None }),
            check_out: Some(waypoint_shared::StayPoint { date: "2024-06-01".to_string(), time: None }),
            address: None,
            guests: None,
            confirmation_number: None,
        };
        assert!(matches!(stay_dates(&hotel), Err(CoreError::MalformedBooking { .. })));
    }

    #[test]
    fn test_stay_dates_rejects_oversized_span() {
        let hotel = Hotel {
            id: "h".to_string(),
            name: "H".to_string(),
            check_in: Some(waypoint_shared::StayPoint { date: "2000-01-01".to_string(), time: None }),
            check_out: Some(waypoint_shared::StayPoint { date: "2020-01-01".to_string(), time: None }),
            address: None,
            guests: None,
            confirmation_number: None,
        };
        assert!(matches!(stay_dates(&hotel), Err(CoreError::MalformedBooking { .. })));
    }

    #[test]
    fn test_trip_color_is_stable() {
        assert_eq!(trip_color("abc"), trip_color("abc"));
        assert!(PALETTE.contains(&trip_color("")));
    }
}
