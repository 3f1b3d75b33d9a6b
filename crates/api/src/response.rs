//! Shared response envelope types for API handlers.
//!
//! Read endpoints use the `{ "data": ... }` envelope ([`DataResponse`]),
//! mutations the `{ "success": true, "data": ... }` envelope
//! ([`SuccessResponse`]). The scan endpoint always answers HTTP 200 and
//! distinguishes outcomes in the body ([`SuccessResponse`] /
//! [`ScanRejected`]); handheld scanner clients treat any non-2xx as a
//! transport failure and would retry the scan.

use serde::Serialize;
use smartpack_core::booking::ScanRejection;

/// Standard `{ "data": T }` response envelope.
///
/// Wraps any serializable payload in the project's standard response format.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Successful mutation envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Scan rejection envelope, still delivered with HTTP 200.
///
/// `code` is the stable machine code (`NO_REF`, `ALREADY_SCANNED`,
/// `INVALID_STATUS_110`, ...), `data` carries the offending record's
/// current values so the client can render expected vs. actual.
#[derive(Debug, Serialize)]
pub struct ScanRejected {
    pub success: bool,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub message: String,
}

impl From<&ScanRejection> for ScanRejected {
    fn from(rejection: &ScanRejection) -> Self {
        Self {
            success: false,
            code: rejection.code(),
            data: rejection.data(),
            message: rejection.to_string(),
        }
    }
}
