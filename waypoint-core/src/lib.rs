pub mod clock;
pub mod timeline;
pub mod today;
pub mod trip;

pub use clock::{Clock, FixedClock, SystemClock};
pub use timeline::{build_timeline, EventKind, EventPayload, Timeline, TimelineEvent};
pub use today::{today_flight, today_hotel, FlightContext, HotelContext, HotelStatus};
pub use trip::{is_trip_past, sort_for_display, trip_color, TripPhase, TripSummary};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Malformed booking {id}: {reason}")]
    MalformedBooking { id: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
