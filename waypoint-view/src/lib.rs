pub mod adapter;
pub mod controller;
pub mod generation;
pub mod sink;
pub mod tabs;

pub use adapter::{
    day_views, tab_blocks, today_view, trip_cards, DayView, EventView, FlightCard, HotelCard,
    TodayFlightView, TodayHotelView, TodayView, TripCard,
};
pub use controller::{DashboardController, DeferredRender, ViewError};
pub use generation::{Epoch, RenderGenerationGuard};
pub use sink::{Block, Container, MemorySink, RenderSink, SinkOp};
pub use tabs::{Tab, TabLazyRenderer};
