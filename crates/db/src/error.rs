//! Repository error type.
//!
//! Business guards run inside the repositories' transactions (they must see
//! the locked rows), so repository results carry typed domain rejections as
//! well as driver errors. The API crate maps each variant onto the wire.

use smartpack_core::booking::{ModuleKind, ScanRejection, TransitionError};

/// Error returned by the booking repositories.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Underlying driver error.
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    /// A lookup by identifier found nothing.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The request conflicts with existing rows (e.g. a draft_id already
    /// claimed by another module).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested transition is illegal for the booking's current state.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// A scan guard rejected the request (includes the re-scan toggle).
    #[error(transparent)]
    Scan(#[from] ScanRejection),

    /// A stored status code did not decode for its module. Indicates data
    /// written outside this service.
    #[error("stored status code {code} is not valid for module {module}")]
    CorruptStatus { module: ModuleKind, code: i16 },

    /// A stored asset status code did not decode.
    #[error("asset {asset_code} holds unknown status code {code}")]
    CorruptAssetStatus { asset_code: String, code: i16 },
}

impl DbError {
    /// Shorthand for a booking miss by draft_id.
    pub fn booking_not_found(draft_id: &str) -> Self {
        DbError::NotFound {
            entity: "Booking",
            id: draft_id.to_string(),
        }
    }
}
