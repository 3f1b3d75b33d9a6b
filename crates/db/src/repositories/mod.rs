pub mod asset_repo;
pub mod booking_repo;
pub mod scan_repo;

pub use asset_repo::AssetRepo;
pub use booking_repo::BookingRepo;
pub use scan_repo::{ReturnSelector, ScanRepo};

use smartpack_core::booking::{BookingStatus, ModuleKind};

use crate::error::DbError;
use crate::models::booking::Booking;

/// Decode a booking's persisted status code, failing loudly on codes this
/// service never writes.
pub(crate) fn booking_status(module: ModuleKind, booking: &Booking) -> Result<BookingStatus, DbError> {
    BookingStatus::from_code(module, booking.status).ok_or(DbError::CorruptStatus {
        module,
        code: booking.status,
    })
}
