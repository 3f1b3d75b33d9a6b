//! Booking workflow domain rules.
//!
//! Split into the module taxonomy ([`module`]), the booking status
//! enumeration ([`status`]), the explicit transition table ([`transition`]),
//! reference number formatting ([`refid`]), and scan normalization +
//! validation ([`scan`]).

pub mod module;
pub mod refid;
pub mod scan;
pub mod status;
pub mod transition;

pub use module::ModuleKind;
pub use scan::ScanRejection;
pub use status::BookingStatus;
pub use transition::{transition, BookingAction, TransitionError};
