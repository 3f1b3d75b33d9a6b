//! Reference number formatting.
//!
//! The sequence itself lives in the database (`ref_sequences`, upserted
//! inside the booking transaction); this module only owns the human-readable
//! shape: `<prefix>-<YYYYMM>-<zero-padded sequence>`.

use chrono::Datelike;

use super::module::ModuleKind;
use crate::types::Timestamp;

/// Period key a sequence counter is scoped to (`YYYYMM`).
pub fn period_for(at: Timestamp) -> String {
    format!("{:04}{:02}", at.year(), at.month())
}

/// Format a reference number for `module` in `period` with sequence `seq`.
pub fn format_ref(module: ModuleKind, period: &str, seq: i32) -> String {
    format!("{}-{}-{:04}", module.ref_prefix(), period, seq)
}
