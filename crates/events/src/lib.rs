//! Booking event fan-out.
//!
//! Re-exports the bus types; see [`bus`].

pub mod bus;

pub use bus::{BookingEvent, EventAction, EventBus};
