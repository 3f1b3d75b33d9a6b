//! Explicit booking transition table.
//!
//! Every state-changing endpoint validates its move here before touching the
//! database, regardless of what the client's button gating allowed. Guards
//! that need data the table cannot see (ledger count, ref presence, header
//! fields) are enforced by the repositories and surface through the same
//! [`TransitionError`] type.

use serde::Serialize;

use super::status::BookingStatus;

/// A state-changing operation requested against a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    GenerateRef,
    SaveHeader,
    Scan,
    Finalize,
    Unlock,
    Cancel,
    ConfirmOutput,
    Return,
}

impl BookingAction {
    /// Stable name used in error payloads.
    pub fn name(self) -> &'static str {
        match self {
            BookingAction::GenerateRef => "generate_ref",
            BookingAction::SaveHeader => "save_header",
            BookingAction::Scan => "scan",
            BookingAction::Finalize => "finalize",
            BookingAction::Unlock => "unlock",
            BookingAction::Cancel => "cancel",
            BookingAction::ConfirmOutput => "confirm_output",
            BookingAction::Return => "return",
        }
    }
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed rejection for an illegal transition attempt.
///
/// Carries enough context for the client to render a specific remediation
/// message instead of a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The booking's current state does not permit the requested action.
    #[error("booking is {actual} and cannot accept {action}")]
    InvalidState {
        action: BookingAction,
        actual: BookingStatus,
    },

    /// Cancel was requested while scanned assets remain on the ledger.
    /// Assets must be explicitly returned first; there is no silent unwind.
    #[error("booking holds {attendees} scanned assets and cannot be canceled")]
    NotCancelable { attendees: i32 },

    /// The header cannot be saved before a reference number exists.
    #[error("a reference number must be generated before the header is saved")]
    RefRequired,

    /// Required header fields were missing for a save/finalize.
    #[error("missing required header fields: {0}")]
    MissingHeaderFields(String),
}

impl TransitionError {
    /// Stable error code for the wire.
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::InvalidState { .. } => "INVALID_STATUS",
            TransitionError::NotCancelable { .. } => "NOT_CANCELABLE",
            TransitionError::RefRequired => "REF_REQUIRED",
            TransitionError::MissingHeaderFields(_) => "MISSING_HEADER_FIELDS",
        }
    }
}

/// Resolve the target state for `action` from `current`, or reject.
///
/// The table is exhaustive over [`BookingAction`]; any `(state, action)`
/// pair it does not name is illegal.
pub fn transition(
    current: BookingStatus,
    action: BookingAction,
) -> Result<BookingStatus, TransitionError> {
    use BookingAction as A;
    use BookingStatus as S;

    let next = match (current, action) {
        // Reference generation does not move the state; idempotent
        // regeneration is handled by the caller before reaching here.
        (S::DraftNew, A::GenerateRef) => S::DraftNew,

        // Header save confirms a fresh draft. Re-saving while editable is
        // allowed but never moves the state: an unlocked booking stays
        // `UnlockedForEdit` until it is re-finalized, so the unlock detour
        // cannot re-open the cancel path.
        (S::DraftNew, A::SaveHeader) => S::HeaderSaved,
        (s @ (S::HeaderSaved | S::UnlockedForEdit), A::SaveHeader) => s,

        // Scanning and returning keep the state; only the ledger changes.
        (S::HeaderSaved, A::Scan) => S::HeaderSaved,
        (S::UnlockedForEdit, A::Scan) => S::UnlockedForEdit,
        (s @ (S::DraftNew | S::HeaderSaved | S::UnlockedForEdit | S::Finalized), A::Return) => s,

        (S::HeaderSaved | S::UnlockedForEdit, A::Finalize) => S::Finalized,

        (S::Finalized, A::Unlock) => S::UnlockedForEdit,
        (S::Finalized, A::ConfirmOutput) => S::LockedTerminal,

        // Cancel only from pre-finalize states; the empty-ledger guard is
        // enforced by the repository with NotCancelable.
        (S::DraftNew | S::HeaderSaved, A::Cancel) => S::Canceled,

        (actual, action) => return Err(TransitionError::InvalidState { action, actual }),
    };
    Ok(next)
}
