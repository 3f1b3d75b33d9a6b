//! Scan payload normalization and validation.
//!
//! A scan request carries the raw keyboard-wedge payload from a barcode/QR
//! scanner. Scanners at the warehouses are configured against a Thai
//! Kedmanee layout, so the digit row, dash, and backslash keys arrive as
//! Thai glyphs; [`normalize_payload`] recovers the intended ASCII token.
//! [`validate_scan`] then evaluates the business guards in a fixed order,
//! short-circuiting on the first failure with a distinct [`ScanRejection`]
//! so the client can render context-specific UI.

use serde_json::json;

use super::module::ModuleKind;
use super::status::BookingStatus;
use crate::asset::AssetStatus;

/// Canonical field separator inside a QR payload. Its presence signals the
/// payload was typed or pasted rather than scanned through the Thai layout,
/// so no glyph substitution is applied.
pub const FIELD_SEPARATOR: char = '|';

/// Map one Kedmanee-shifted glyph back to the key that produced it.
///
/// Covers the digit row, the dash key, and the backslash key (pipe). Any
/// other character passes through unchanged.
fn unshift_kedmanee(c: char) -> char {
    match c {
        'ๅ' => '1',
        '/' => '2',
        '-' => '3',
        'ภ' => '4',
        'ถ' => '5',
        'ุ' => '6',
        'ึ' => '7',
        'ค' => '8',
        'ต' => '9',
        'จ' => '0',
        'ข' => '-',
        'ฃ' | 'ฅ' => FIELD_SEPARATOR,
        other => other,
    }
}

/// Normalize a raw scanner payload to its intended ASCII form.
pub fn normalize_payload(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains(FIELD_SEPARATOR) {
        return trimmed.to_string();
    }
    trimmed.chars().map(unshift_kedmanee).collect()
}

/// Extract the asset code from a normalized payload.
///
/// Payloads are `|`-separated; the asset code is the first field. A payload
/// without separators is the asset code itself.
pub fn asset_code_from_payload(normalized: &str) -> &str {
    normalized
        .split(FIELD_SEPARATOR)
        .next()
        .unwrap_or(normalized)
        .trim()
}

/// Booking fields a scan is validated against.
#[derive(Debug, Clone)]
pub struct ScanBooking<'a> {
    pub status: BookingStatus,
    pub ref_id: Option<&'a str>,
    pub origin: Option<&'a str>,
}

/// Asset registry fields a scan is validated against.
#[derive(Debug, Clone)]
pub struct ScanAsset<'a> {
    pub status: AssetStatus,
    pub destination: Option<&'a str>,
}

/// A scan that was not accepted.
///
/// Not every variant is an error: [`AlreadyScanned`](ScanRejection::AlreadyScanned)
/// is a toggle signal the client routes to an undo/return confirmation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanRejection {
    /// The booking is finalized/terminal and cannot accept scans.
    #[error("booking is {status} and cannot accept scans")]
    InvalidBookingStatus { status: BookingStatus },

    /// No reference number has been generated yet.
    #[error("generate a reference number before scanning")]
    MissingRef,

    /// The booking header has not been saved yet.
    #[error("save the booking header before scanning")]
    HeaderNotSaved,

    /// The payload did not resolve to a registered asset.
    #[error("asset {asset_code} is not registered")]
    UnknownAsset { asset_code: String },

    /// The asset is already on this booking's ledger. Re-scanning a present
    /// item means "undo", not "error".
    #[error("asset {asset_code} is already scanned into this booking")]
    AlreadyScanned { asset_code: String },

    /// The asset's current status does not match the module's pre-state.
    #[error("asset is {actual}, expected {expected}")]
    InvalidAssetStatus {
        expected: AssetStatus,
        actual: AssetStatus,
    },

    /// The asset's recorded destination does not match the booking's
    /// declared origin (System-In only).
    #[error("asset destination {actual_destination} does not match booking origin {expected_origin}")]
    InvalidOrigin {
        expected_origin: String,
        actual_destination: String,
    },
}

impl ScanRejection {
    /// Stable wire code. The asset-status family embeds the offending
    /// asset's numeric code so the client can render the exact mismatch.
    pub fn code(&self) -> String {
        match self {
            ScanRejection::InvalidBookingStatus { .. } => "INVALID_STATUS".into(),
            ScanRejection::MissingRef => "NO_REF".into(),
            ScanRejection::HeaderNotSaved => "HEADER_NOT_SAVED".into(),
            ScanRejection::UnknownAsset { .. } => "ASSET_NOT_FOUND".into(),
            ScanRejection::AlreadyScanned { .. } => "ALREADY_SCANNED".into(),
            ScanRejection::InvalidAssetStatus { actual, .. } => {
                format!("INVALID_STATUS_{}", actual.code())
            }
            ScanRejection::InvalidOrigin { .. } => "INVALID_ORIGIN".into(),
        }
    }

    /// Structured payload for the rejection envelope: the offending record's
    /// current values, so the client can show expected vs. actual without a
    /// follow-up query.
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            ScanRejection::InvalidBookingStatus { status } => {
                Some(json!({ "booking_status": status.name() }))
            }
            ScanRejection::AlreadyScanned { asset_code }
            | ScanRejection::UnknownAsset { asset_code } => {
                Some(json!({ "asset_code": asset_code }))
            }
            ScanRejection::InvalidAssetStatus { expected, actual } => Some(json!({
                "expected_status": expected.name(),
                "actual_status": actual.name(),
                "actual_status_code": actual.code(),
            })),
            ScanRejection::InvalidOrigin {
                expected_origin,
                actual_destination,
            } => Some(json!({
                "expected_origin": expected_origin,
                "actual_destination": actual_destination,
            })),
            ScanRejection::MissingRef | ScanRejection::HeaderNotSaved => None,
        }
    }

    /// Whether this rejection is the re-scan toggle rather than a failure.
    pub fn is_toggle(&self) -> bool {
        matches!(self, ScanRejection::AlreadyScanned { .. })
    }
}

/// Evaluate the scan guards in order, short-circuiting on first failure.
///
/// `asset` is `None` when the code missed the registry; `already_scanned`
/// reflects the booking's ledger at the time of the (locked) read. Callers
/// must hold the per-draft lock and run inside the same transaction that
/// applies the mutation, otherwise the check-then-act is racy.
pub fn validate_scan(
    module: ModuleKind,
    booking: &ScanBooking<'_>,
    asset: Option<&ScanAsset<'_>>,
    already_scanned: bool,
    asset_code: &str,
) -> Result<(), ScanRejection> {
    // Terminal / finalized bookings reject outright.
    if !booking.status.allows_scan() && booking.status != BookingStatus::DraftNew {
        return Err(ScanRejection::InvalidBookingStatus {
            status: booking.status,
        });
    }

    if booking.ref_id.is_none() {
        return Err(ScanRejection::MissingRef);
    }

    if booking.status == BookingStatus::DraftNew {
        return Err(ScanRejection::HeaderNotSaved);
    }

    if already_scanned {
        return Err(ScanRejection::AlreadyScanned {
            asset_code: asset_code.to_string(),
        });
    }

    let asset = asset.ok_or_else(|| ScanRejection::UnknownAsset {
        asset_code: asset_code.to_string(),
    })?;

    let expected = module.required_asset_status();
    if asset.status != expected {
        return Err(ScanRejection::InvalidAssetStatus {
            expected,
            actual: asset.status,
        });
    }

    if module.checks_origin() {
        let expected_origin = booking.origin.unwrap_or_default();
        let actual_destination = asset.destination.unwrap_or_default();
        if expected_origin != actual_destination {
            return Err(ScanRejection::InvalidOrigin {
                expected_origin: expected_origin.to_string(),
                actual_destination: actual_destination.to_string(),
            });
        }
    }

    Ok(())
}
