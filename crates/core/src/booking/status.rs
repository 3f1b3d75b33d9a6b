//! Booking lifecycle status enumeration.
//!
//! The legacy system persisted bare numeric strings (`"130"`, `"132"`, ...)
//! whose meaning lived in comments. Here every persisted code decodes into
//! [`BookingStatus`] and all legality checks go through the enum; the
//! numeric blocks are kept only at the storage and wire boundaries for
//! client compatibility.

use serde::{Deserialize, Serialize};

use super::module::ModuleKind;

/// Lifecycle state of a booking. The single source of truth for which
/// operations are legal; see [`super::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created client-side and persisted; no reference number, no header.
    DraftNew,
    /// Header fields validated and saved; scanning permitted.
    HeaderSaved,
    /// Confirmed; immutable except via explicit unlock.
    Finalized,
    /// Terminal; only reachable while the ledger is empty.
    Canceled,
    /// A finalized booking reopened for correction. Behaves like
    /// [`HeaderSaved`](BookingStatus::HeaderSaved) but retains prior scans.
    UnlockedForEdit,
    /// Hard-finalized via confirm-output; permanently closed.
    LockedTerminal,
}

/// Offsets within a module's status-code block.
const OFFSETS: [(BookingStatus, i16); 6] = [
    (BookingStatus::DraftNew, 0),
    (BookingStatus::HeaderSaved, 1),
    (BookingStatus::Finalized, 2),
    (BookingStatus::Canceled, 3),
    (BookingStatus::UnlockedForEdit, 4),
    (BookingStatus::LockedTerminal, 5),
];

impl BookingStatus {
    /// Numeric code persisted for this status in the given module's block
    /// (System-In 130..135, System-Repair 150..155, System-Out 170..175).
    pub fn code(self, module: ModuleKind) -> i16 {
        let offset = OFFSETS
            .iter()
            .find(|(status, _)| *status == self)
            .map(|(_, offset)| *offset)
            .unwrap_or(0);
        module.status_base() + offset
    }

    /// Decode a persisted numeric code for the given module.
    pub fn from_code(module: ModuleKind, code: i16) -> Option<Self> {
        let offset = code - module.status_base();
        OFFSETS
            .iter()
            .find(|(_, o)| *o == offset)
            .map(|(status, _)| *status)
    }

    /// Whether the booking can never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Canceled | BookingStatus::LockedTerminal)
    }

    /// Whether scans are accepted in this state.
    pub fn allows_scan(self) -> bool {
        matches!(
            self,
            BookingStatus::HeaderSaved | BookingStatus::UnlockedForEdit
        )
    }

    /// Whether header fields may still be mutated.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            BookingStatus::DraftNew | BookingStatus::HeaderSaved | BookingStatus::UnlockedForEdit
        )
    }

    /// Stable name used in error messages and event payloads.
    pub fn name(self) -> &'static str {
        match self {
            BookingStatus::DraftNew => "draft_new",
            BookingStatus::HeaderSaved => "header_saved",
            BookingStatus::Finalized => "finalized",
            BookingStatus::Canceled => "canceled",
            BookingStatus::UnlockedForEdit => "unlocked_for_edit",
            BookingStatus::LockedTerminal => "locked_terminal",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
