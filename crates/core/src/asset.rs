//! Asset registry status taxonomy.
//!
//! Asset lifecycle statuses are persisted as numeric codes (the format the
//! legacy clients display), but all comparisons in this codebase go through
//! [`AssetStatus`].

use serde::{Deserialize, Serialize};

/// Lifecycle status of a physical asset in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetStatus {
    /// Registered but never stocked.
    Registered,
    /// In a warehouse, available for issue.
    InStock,
    /// Issued to a location / in use.
    Issued,
    /// Reported defective, awaiting repair intake.
    Defective,
    /// In the repair cycle.
    InRepair,
}

impl AssetStatus {
    /// Numeric code persisted in the `assets.status` column.
    pub fn code(self) -> i16 {
        match self {
            AssetStatus::Registered => 100,
            AssetStatus::InStock => 110,
            AssetStatus::Issued => 120,
            AssetStatus::Defective => 140,
            AssetStatus::InRepair => 141,
        }
    }

    /// Decode a persisted numeric code.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            100 => Some(AssetStatus::Registered),
            110 => Some(AssetStatus::InStock),
            120 => Some(AssetStatus::Issued),
            140 => Some(AssetStatus::Defective),
            141 => Some(AssetStatus::InRepair),
            _ => None,
        }
    }

    /// Human-readable status name shown in ledger rows.
    pub fn name(self) -> &'static str {
        match self {
            AssetStatus::Registered => "registered",
            AssetStatus::InStock => "in-stock",
            AssetStatus::Issued => "issued",
            AssetStatus::Defective => "defective",
            AssetStatus::InRepair => "in-repair",
        }
    }

    /// Display tag class used by the client's status badges.
    pub fn class(self) -> &'static str {
        match self {
            AssetStatus::Registered => "default",
            AssetStatus::InStock => "green",
            AssetStatus::Issued => "blue",
            AssetStatus::Defective => "red",
            AssetStatus::InRepair => "orange",
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
