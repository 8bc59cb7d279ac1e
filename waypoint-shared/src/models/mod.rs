pub mod booking;
pub mod cache;
pub mod mutation;
pub mod trip;
