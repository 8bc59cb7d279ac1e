//! Turns the pure itinerary output into owned view models. No rendering
//! happens here; the sink decides what a view model looks like.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use waypoint_core::clock::{parse_date, parse_minutes};
use waypoint_core::timeline::day_number;
use waypoint_core::trip::{phase, stay_dates};
use waypoint_core::{
    build_timeline, sort_for_display, today_flight, today_hotel, trip_color, EventKind,
    EventPayload, FlightContext, HotelContext, HotelStatus, TimelineEvent, TripPhase, TripSummary,
};
use waypoint_shared::{Flight, Trip};

use crate::sink::Block;
use crate::tabs::Tab;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripCard {
    pub trip_id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub cover_photo: Option<String>,
    pub color: &'static str,
    pub phase: TripPhase,
    pub summary: TripSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayFlightView {
    pub trip_id: String,
    pub trip_title: String,
    pub color: &'static str,
    pub flight_id: String,
    pub flight_number: String,
    pub route: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub arrival_date: Option<String>,
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayHotelView {
    pub trip_id: String,
    pub trip_title: String,
    pub color: &'static str,
    pub hotel_id: String,
    pub name: String,
    pub status: HotelStatus,
    /// Blank on a plain stay day
    pub time: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodayView {
    pub flight: Option<TodayFlightView>,
    pub hotel: Option<TodayHotelView>,
}

impl TodayView {
    pub fn into_blocks(self) -> Vec<Block> {
        let mut blocks = Vec::new();
        if let Some(flight) = self.flight {
            blocks.push(Block::TodayFlight(flight));
        }
        if let Some(hotel) = self.hotel {
            blocks.push(Block::TodayHotel(hotel));
        }
        blocks
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub booking_id: String,
    pub kind: EventKind,
    pub time: Option<String>,
    pub title: String,
    pub detail: Option<String>,
}

/// One day of the timeline. An empty `events` list renders as "nothing planned".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: String,
    pub day_number: Option<i64>,
    pub events: Vec<EventView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightCard {
    pub flight_id: String,
    pub date: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub arrival_next_day: bool,
    pub flight_number: String,
    pub route: String,
    pub booking_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelCard {
    pub hotel_id: String,
    pub name: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub nights: Option<i64>,
    pub address: Option<String>,
}

pub fn trip_card(trip: &Trip, today: NaiveDate, lang: &str) -> TripCard {
    TripCard {
        trip_id: trip.id.clone(),
        title: trip.title.resolve(lang).to_string(),
        start_date: trip.start_date.clone(),
        end_date: trip.end_date.clone(),
        cover_photo: trip.cover_photo.clone(),
        color: trip_color(&trip.id),
        phase: phase(trip, today),
        summary: TripSummary::of(trip),
    }
}

/// Cards in list order: ongoing, upcoming, then past.
pub fn trip_cards(trips: &[Trip], today: NaiveDate, lang: &str) -> Vec<TripCard> {
    let mut trips = trips.to_vec();
    sort_for_display(&mut trips, today);
    trips.iter().map(|t| trip_card(t, today, lang)).collect()
}

pub fn today_view(today_trips: &[Trip], now: NaiveDateTime, lang: &str) -> TodayView {
    TodayView {
        flight: today_flight(today_trips, now).map(|ctx| today_flight_view(&ctx, lang)),
        hotel: today_hotel(today_trips, now).map(|ctx| today_hotel_view(&ctx, lang)),
    }
}

fn today_flight_view(ctx: &FlightContext<'_>, lang: &str) -> TodayFlightView {
    let flight = ctx.flight;
    TodayFlightView {
        trip_id: ctx.trip_id.to_string(),
        trip_title: ctx.trip_title.resolve(lang).to_string(),
        color: ctx.trip_color,
        flight_id: flight.id.clone(),
        flight_number: flight.flight_number.clone(),
        route: route(flight),
        departure_time: flight.departure_time.clone(),
        arrival_time: flight.arrival_time.clone(),
        arrival_date: ctx.arrival_date().ok().map(|d| d.to_string()),
        terminal: flight.departure.terminal.clone(),
    }
}

fn today_hotel_view(ctx: &HotelContext<'_>, lang: &str) -> TodayHotelView {
    TodayHotelView {
        trip_id: ctx.trip_id.to_string(),
        trip_title: ctx.trip_title.resolve(lang).to_string(),
        color: ctx.trip_color,
        hotel_id: ctx.hotel.id.clone(),
        name: ctx.hotel.name.clone(),
        status: ctx.status,
        time: ctx.display_time().to_string(),
        address: ctx.hotel.address.clone(),
    }
}

pub fn day_views(trip: &Trip) -> Vec<DayView> {
    build_timeline(trip)
        .into_iter()
        .map(|(date, events)| DayView {
            date: date.to_string(),
            day_number: day_number(trip, date),
            events: events.iter().map(event_view).collect(),
        })
        .collect()
}

pub fn event_view(event: &TimelineEvent<'_>) -> EventView {
    let (title, detail) = match (event.kind, event.payload) {
        (_, EventPayload::Flight(flight)) => {
            let title = format!("{} {}", flight.flight_number, route(flight));
            (title.trim().to_string(), flight.departure.terminal.clone())
        }
        (EventKind::HotelStay, EventPayload::Hotel(hotel)) => (hotel.name.clone(), None),
        (_, EventPayload::Hotel(hotel)) => (hotel.name.clone(), hotel.address.clone()),
        (_, EventPayload::Activity(activity)) => (
            activity.name.clone(),
            activity
                .description
                .clone()
                .or_else(|| activity.location.clone()),
        ),
    };

    EventView {
        booking_id: event.payload.id().to_string(),
        kind: event.kind,
        time: event.time.map(format_time),
        title,
        detail,
    }
}

/// Flights by departure date and time; unparseable times sort last.
pub fn flight_cards(trip: &Trip) -> Vec<FlightCard> {
    let mut flights: Vec<&Flight> = trip.flights.iter().collect();
    flights.sort_by_key(|f| {
        (
            parse_date(&f.date).ok(),
            parse_minutes(&f.departure_time).unwrap_or(u32::MAX),
        )
    });

    flights
        .into_iter()
        .map(|f| FlightCard {
            flight_id: f.id.clone(),
            date: f.date.clone(),
            departure_time: f.departure_time.clone(),
            arrival_time: f.arrival_time.clone(),
            arrival_next_day: f.arrival_next_day,
            flight_number: f.flight_number.clone(),
            route: route(f),
            booking_reference: f.booking_reference.clone(),
        })
        .collect()
}

pub fn hotel_cards(trip: &Trip) -> Vec<HotelCard> {
    let mut cards: Vec<HotelCard> = trip
        .hotels
        .iter()
        .map(|h| HotelCard {
            hotel_id: h.id.clone(),
            name: h.name.clone(),
            check_in: h.check_in.as_ref().map(|p| p.date.clone()),
            check_out: h.check_out.as_ref().map(|p| p.date.clone()),
            nights: stay_dates(h).ok().map(|(i, o)| (o - i).num_days()),
            address: h.address.clone(),
        })
        .collect();
    cards.sort_by(|a, b| a.check_in.cmp(&b.check_in));
    cards
}

/// Blocks for one tab of an open trip.
pub fn tab_blocks(trip: &Trip, tab: Tab) -> Vec<Block> {
    let blocks: Vec<Block> = match tab {
        Tab::Activities => day_views(trip).into_iter().map(Block::Day).collect(),
        Tab::Flights => flight_cards(trip).into_iter().map(Block::FlightCard).collect(),
        Tab::Hotels => hotel_cards(trip).into_iter().map(Block::HotelCard).collect(),
    };

    if blocks.is_empty() {
        return vec![Block::notice(match tab {
            Tab::Activities => "timeline.empty",
            Tab::Flights => "flights.empty",
            Tab::Hotels => "hotels.empty",
        })];
    }
    blocks
}

fn route(flight: &Flight) -> String {
    format!("{} → {}", flight.departure.code, flight.arrival.code)
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
