//! Today-context: the single flight and the single hotel that matter for the
//! current day, used by the dashboard summary.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;
use waypoint_shared::{Flight, Hotel, LocalizedText, Trip};

use crate::clock::{minutes_since_midnight, parse_date, parse_minutes};
use crate::trip::{stay_dates, trip_color};
use crate::CoreResult;

/// Today's flight together with the trip that owns it.
#[derive(Debug, Clone, Serialize)]
pub struct FlightContext<'a> {
    pub trip_id: &'a str,
    pub trip_title: &'a LocalizedText,
    pub trip_color: &'static str,
    pub flight: &'a Flight,
}

impl FlightContext<'_> {
    /// Calendar date the flight lands on.
    pub fn arrival_date(&self) -> CoreResult<NaiveDate> {
        let departure = parse_date(&self.flight.date)?;
        if self.flight.arrival_next_day {
            Ok(departure.succ_opt().unwrap_or(departure))
        } else {
            Ok(departure)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelStatus {
    CheckIn,
    Stay,
    CheckOut,
}

/// Today's hotel together with the trip that owns it.
#[derive(Debug, Clone, Serialize)]
pub struct HotelContext<'a> {
    pub trip_id: &'a str,
    pub trip_title: &'a LocalizedText,
    pub trip_color: &'static str,
    pub hotel: &'a Hotel,
    pub status: HotelStatus,
}

impl HotelContext<'_> {
    /// Check-in time on arrival day, check-out time on departure day, blank
    /// otherwise.
    pub fn display_time(&self) -> &str {
        let point = match self.status {
            HotelStatus::CheckIn => self.hotel.check_in.as_ref(),
            HotelStatus::CheckOut => self.hotel.check_out.as_ref(),
            HotelStatus::Stay => None,
        };
        point.and_then(|p| p.time.as_deref()).unwrap_or("")
    }
}

/// The earliest-departing flight that is still in the air or on the ground
/// ahead of the traveller today.
///
/// A flight that departs today and lands tomorrow stays visible all day. A
/// flight that landed today (same-day, or overnight from yesterday) drops off
/// once its arrival minute has passed.
pub fn today_flight(today_trips: &[Trip], now: NaiveDateTime) -> Option<FlightContext<'_>> {
    let today = now.date();
    let current = minutes_since_midnight(now.time());

    let mut candidates: Vec<(u32, FlightContext<'_>)> = Vec::new();
    for trip in today_trips {
        for flight in &trip.flights {
            match active_departure(flight, today, current) {
                Ok(Some(departure)) => candidates.push((
                    departure,
                    FlightContext {
                        trip_id: &trip.id,
                        trip_title: &trip.title,
                        trip_color: trip_color(&trip.id),
                        flight,
                    },
                )),
                Ok(None) => {}
                Err(err) => debug!(flight_id = %flight.id, error = %err, "Skipping flight"),
            }
        }
    }

    // Stable: equal departure times keep storage order
    candidates.sort_by_key(|(departure, _)| *departure);
    candidates.into_iter().next().map(|(_, ctx)| ctx)
}

/// Departure minute of `flight` if it is active at `current` on `today`.
fn active_departure(flight: &Flight, today: NaiveDate, current: u32) -> CoreResult<Option<u32>> {
    let date = parse_date(&flight.date)?;
    let departs_today = date == today;
    let landed_from_yesterday = flight.arrival_next_day && date.succ_opt() == Some(today);

    if !departs_today && !landed_from_yesterday {
        return Ok(None);
    }

    let departure = parse_minutes(&flight.departure_time)?;
    let active = if departs_today && flight.arrival_next_day {
        true
    } else {
        current <= parse_minutes(&flight.arrival_time)?
    };

    Ok(active.then_some(departure))
}

/// The first hotel, in storage order, whose stay covers today. Visibility runs
/// from check-in day through the morning after check-out.
///
/// Overlapping stays are resolved by storage order only; the first match wins
/// even when a later hotel would check out sooner.
pub fn today_hotel(today_trips: &[Trip], now: NaiveDateTime) -> Option<HotelContext<'_>> {
    let today = now.date();

    for trip in today_trips {
        for hotel in &trip.hotels {
            match hotel_status(hotel, today) {
                Ok(Some(status)) => {
                    return Some(HotelContext {
                        trip_id: &trip.id,
                        trip_title: &trip.title,
                        trip_color: trip_color(&trip.id),
                        hotel,
                        status,
                    })
                }
                Ok(None) => {}
                Err(err) => debug!(hotel_id = %hotel.id, error = %err, "Skipping hotel"),
            }
        }
    }

    None
}

fn hotel_status(hotel: &Hotel, today: NaiveDate) -> CoreResult<Option<HotelStatus>> {
    let (check_in, check_out) = stay_dates(hotel)?;
    let morning_after = check_out.succ_opt().unwrap_or(check_out);

    if today < check_in || today > morning_after {
        return Ok(None);
    }

    let is_check_out = today == check_out || today == morning_after;
    let is_check_in = today == check_in;

    let status = if is_check_out {
        HotelStatus::CheckOut
    } else if is_check_in {
        HotelStatus::CheckIn
    } else {
        HotelStatus::Stay
    };

    Ok(Some(status))
}
