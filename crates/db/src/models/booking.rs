//! Booking and scan ledger row models plus the request DTOs of the booking
//! endpoints. Field names on the wire follow the legacy client contract
//! (`qrString`, `refID`).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smartpack_core::booking::{BookingStatus, ModuleKind};
use smartpack_core::types::{DbId, Timestamp};

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub module: String,
    pub draft_id: String,
    #[serde(rename = "refID")]
    pub ref_id: Option<String>,
    /// Numeric status code in the module's block; decode with
    /// [`Booking::status_enum`].
    pub status: i16,
    pub objective: Option<String>,
    pub booking_remark: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub attendees: i32,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_by: String,
    pub updated_at: Timestamp,
}

impl Booking {
    /// Decode the stored module wire name.
    pub fn module_kind(&self) -> Option<ModuleKind> {
        self.module.parse().ok()
    }

    /// Decode the persisted status code against the booking's module.
    pub fn status_enum(&self) -> Option<BookingStatus> {
        let module = self.module_kind()?;
        BookingStatus::from_code(module, self.status)
    }
}

/// A row from the `booking_scans` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanEntry {
    pub id: DbId,
    pub booking_id: DbId,
    pub asset_code: String,
    pub part_code: Option<String>,
    /// Display projection of the asset's status at scan time.
    pub status_name: String,
    pub status_class: String,
    pub prev_status: i16,
    pub prev_origin: Option<String>,
    pub prev_destination: Option<String>,
    pub scan_by: String,
    pub scan_at: Timestamp,
}

/// Full booking snapshot returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    pub booking: Booking,
    pub assets: Vec<ScanEntry>,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /{module}/init-booking`.
#[derive(Debug, Clone, Deserialize)]
pub struct InitBookingRequest {
    pub draft_id: String,
    pub objective: Option<String>,
}

/// Query string carrying a draft id (`detail`, `list`).
#[derive(Debug, Clone, Deserialize)]
pub struct DraftQuery {
    pub draft_id: String,
}

/// Body of `POST /{module}/generate-ref`, `unlock`, `cancel`,
/// `confirm-output`.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub draft_id: String,
}

/// Body of `POST /{module}/confirm` and `POST /{module}/finalize`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderRequest {
    pub draft_id: String,
    pub booking_remark: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// Body of `POST /{module}/scan`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    #[serde(rename = "qrString")]
    pub qr_string: String,
    pub draft_id: String,
    /// The caller's view of the reference number; informational only, the
    /// server re-reads the booking under lock.
    #[serde(rename = "refID")]
    pub ref_id: Option<String>,
}

/// Body of `POST /{module}/return`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnRequest {
    pub ids: Vec<DbId>,
    pub draft_id: String,
}

/// Body of `POST /{module}/return-single`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnSingleRequest {
    pub asset_code: String,
    pub draft_id: String,
}
