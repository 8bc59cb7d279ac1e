//! Day-by-day itinerary built from a trip's flights, hotels and activities.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use waypoint_shared::{Activity, Flight, Hotel, Trip};

use crate::clock::{parse_date, parse_optional_time};
use crate::trip::{stay_dates, MAX_SPAN_DAYS};
use crate::CoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    #[serde(rename = "flight")]
    Flight,
    #[serde(rename = "hotel-checkin")]
    HotelCheckIn,
    #[serde(rename = "hotel-stay")]
    HotelStay,
    #[serde(rename = "hotel-checkout")]
    HotelCheckOut,
    #[serde(rename = "activity")]
    Activity,
}

impl EventKind {
    /// Tie-break rank within a day; lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            EventKind::HotelCheckOut => 0,
            EventKind::Flight => 1,
            EventKind::HotelCheckIn => 2,
            EventKind::HotelStay => 3,
            EventKind::Activity => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Flight => "flight",
            EventKind::HotelCheckIn => "hotel-checkin",
            EventKind::HotelStay => "hotel-stay",
            EventKind::HotelCheckOut => "hotel-checkout",
            EventKind::Activity => "activity",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum EventPayload<'a> {
    Flight(&'a Flight),
    Hotel(&'a Hotel),
    Activity(&'a Activity),
}

impl<'a> EventPayload<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            EventPayload::Flight(f) => &f.id,
            EventPayload::Hotel(h) => &h.id,
            EventPayload::Activity(a) => &a.id,
        }
    }
}

/// One entry on the itinerary. Derived on every call, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent<'a> {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub kind: EventKind,
    pub payload: EventPayload<'a>,
}

impl TimelineEvent<'_> {
    /// Untimed before timed, then by time, then by kind priority.
    fn sort_key(&self) -> (bool, Option<NaiveTime>, u8) {
        (self.time.is_some(), self.time, self.kind.priority())
    }
}

pub type Timeline<'a> = BTreeMap<NaiveDate, Vec<TimelineEvent<'a>>>;

/// Buckets every event of `trip` by day.
///
/// Every date between the trip's start and end exists as a key, even with no
/// events. Bookings dated outside that span get their own keys. Bookings that
/// cannot be placed (missing or unparseable dates) are left out.
pub fn build_timeline(trip: &Trip) -> Timeline<'_> {
    let mut days: Timeline<'_> = BTreeMap::new();

    if let Some((start, end)) = trip_bounds(trip) {
        for date in start.iter_days().take_while(|d| *d <= end) {
            days.entry(date).or_default();
        }
    }

    for event in synthesize(trip) {
        days.entry(event.date).or_default().push(event);
    }

    for events in days.values_mut() {
        // Stable, so equal keys keep emission order
        events.sort_by_key(TimelineEvent::sort_key);
    }

    days
}

/// 1-based day index of `date` within the trip.
pub fn day_number(trip: &Trip, date: NaiveDate) -> Option<i64> {
    let start = parse_date(&trip.start_date).ok()?;
    Some((date - start).num_days() + 1)
}

fn trip_bounds(trip: &Trip) -> Option<(NaiveDate, NaiveDate)> {
    match (parse_date(&trip.start_date), parse_date(&trip.end_date)) {
        (Ok(start), Ok(end)) if (end - start).num_days() > MAX_SPAN_DAYS => {
            debug!(trip_id = %trip.id, %start, %end, "Trip span too long; using booking dates only");
            None
        }
        (Ok(start), Ok(end)) if start <= end => Some((start, end)),
        (Ok(_), Ok(_)) => {
            debug!(trip_id = %trip.id, "Trip ends before it starts; using booking dates only");
            None
        }
        (Err(err), _) | (_, Err(err)) => {
            debug!(trip_id = %trip.id, error = %err, "Unparseable trip bounds");
            None
        }
    }
}

fn synthesize(trip: &Trip) -> Vec<TimelineEvent<'_>> {
    let mut events = Vec::new();

    for flight in &trip.flights {
        match flight_event(flight) {
            Ok(event) => events.push(event),
            Err(err) => debug!(flight_id = %flight.id, error = %err, "Skipping flight"),
        }
    }

    for hotel in &trip.hotels {
        if let Err(err) = push_hotel_events(hotel, &mut events) {
            debug!(hotel_id = %hotel.id, error = %err, "Skipping hotel");
        }
    }

    for activity in &trip.activities {
        match parse_date(&activity.date) {
            Ok(date) => events.push(TimelineEvent {
                date,
                time: parse_optional_time(activity.start_time.as_deref()),
                kind: EventKind::Activity,
                payload: EventPayload::Activity(activity),
            }),
            Err(err) => debug!(activity_id = %activity.id, error = %err, "Skipping activity"),
        }
    }

    events
}

fn flight_event(flight: &Flight) -> CoreResult<TimelineEvent<'_>> {
    Ok(TimelineEvent {
        date: parse_date(&flight.date)?,
        time: parse_optional_time(Some(&flight.departure_time)),
        kind: EventKind::Flight,
        payload: EventPayload::Flight(flight),
    })
}

/// Check-in, one untimed stay marker per night strictly inside the stay, and
/// check-out.
fn push_hotel_events<'a>(hotel: &'a Hotel, events: &mut Vec<TimelineEvent<'a>>) -> CoreResult<()> {
    let (check_in, check_out) = stay_dates(hotel)?;
    let point_time = |point: Option<&'a waypoint_shared::StayPoint>| {
        parse_optional_time(point.and_then(|p| p.time.as_deref()))
    };

    events.push(TimelineEvent {
        date: check_in,
        time: point_time(hotel.check_in.as_ref()),
        kind: EventKind::HotelCheckIn,
        payload: EventPayload::Hotel(hotel),
    });

    for date in check_in.iter_days().skip(1).take_while(|d| *d < check_out) {
        events.push(TimelineEvent {
            date,
            time: None,
            kind: EventKind::HotelStay,
            payload: EventPayload::Hotel(hotel),
        });
    }

    events.push(TimelineEvent {
        date: check_out,
        time: point_time(hotel.check_out.as_ref()),
        kind: EventKind::HotelCheckOut,
        payload: EventPayload::Hotel(hotel),
    });

    Ok(())
}
