//! Domain-level error type shared across crates.

/// A domain error raised by core logic or the data-access layer.
///
/// The API crate maps each variant onto an HTTP status and a stable error
/// code; see `smartpack-api`'s `AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by identifier found nothing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"Booking"` or `"Asset"`.
        entity: &'static str,
        /// The identifier that missed (draft_id, asset_code, ...).
        id: String,
    },

    /// Input failed validation before any state change.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request conflicts with current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller lacks a required capability.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}
