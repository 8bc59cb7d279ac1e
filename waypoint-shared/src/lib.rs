pub mod models;

pub use models::booking::{Activity, Airport, Booking, BookingKind, Flight, Hotel, StayPoint};
pub use models::cache::CacheEntry;
pub use models::mutation::TripMutation;
pub use models::trip::{LocalizedText, Trip};
