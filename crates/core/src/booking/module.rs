//! Booking module taxonomy.
//!
//! The three SmartPackage modules share one workflow shape; what differs is
//! the wire name, the event channel, the reference prefix, the numeric
//! status-code block, and the scan rule (which asset pre-state is required,
//! which target state a scan applies, and whether the asset's recorded
//! destination must match the booking's declared origin).

use serde::{Deserialize, Serialize};

use crate::asset::AssetStatus;

/// The booking module a request is operating on.
///
/// Wire names must match the path segment the clients call
/// (`/{module}/scan` etc.) and the channel names they subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Receive issued assets back into stock.
    #[serde(rename = "systemin")]
    SystemIn,
    /// Send defective assets into the repair cycle.
    #[serde(rename = "systemdefective")]
    SystemRepair,
    /// Issue in-stock assets out to a destination.
    #[serde(rename = "systemout")]
    SystemOut,
}

impl ModuleKind {
    /// Path segment / wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::SystemIn => "systemin",
            ModuleKind::SystemRepair => "systemdefective",
            ModuleKind::SystemOut => "systemout",
        }
    }

    /// Event channel name broadcast to clients.
    pub fn channel(self) -> &'static str {
        match self {
            ModuleKind::SystemIn => "systemin:update",
            ModuleKind::SystemRepair => "systemdefective:update",
            ModuleKind::SystemOut => "systemout:update",
        }
    }

    /// Reference number prefix, e.g. `SI-202608-0001`.
    pub fn ref_prefix(self) -> &'static str {
        match self {
            ModuleKind::SystemIn => "SI",
            ModuleKind::SystemRepair => "SD",
            ModuleKind::SystemOut => "SO",
        }
    }

    /// Base of this module's numeric booking-status block.
    pub fn status_base(self) -> i16 {
        match self {
            ModuleKind::SystemIn => 130,
            ModuleKind::SystemRepair => 150,
            ModuleKind::SystemOut => 170,
        }
    }

    /// Asset status an asset must hold before it can be scanned into a
    /// booking of this module.
    pub fn required_asset_status(self) -> AssetStatus {
        match self {
            ModuleKind::SystemIn => AssetStatus::Issued,
            ModuleKind::SystemRepair => AssetStatus::Defective,
            ModuleKind::SystemOut => AssetStatus::InStock,
        }
    }

    /// Asset status a successful scan transitions the asset to.
    pub fn target_asset_status(self) -> AssetStatus {
        match self {
            ModuleKind::SystemIn => AssetStatus::InStock,
            ModuleKind::SystemRepair => AssetStatus::InRepair,
            ModuleKind::SystemOut => AssetStatus::Issued,
        }
    }

    /// Whether a scan must verify the asset's last recorded destination
    /// against the booking's declared origin. Only System-In receives assets
    /// back from a known location.
    pub fn checks_origin(self) -> bool {
        matches!(self, ModuleKind::SystemIn)
    }

    /// Whether a scan stamps the booking's origin/destination pair onto the
    /// asset. System-Out is the operation that establishes an asset's
    /// location pair.
    pub fn stamps_location(self) -> bool {
        matches!(self, ModuleKind::SystemOut)
    }

    /// All modules, for iteration in tests and seeds.
    pub const ALL: [ModuleKind; 3] = [
        ModuleKind::SystemIn,
        ModuleKind::SystemRepair,
        ModuleKind::SystemOut,
    ];
}

impl std::str::FromStr for ModuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "systemin" => Ok(ModuleKind::SystemIn),
            "systemdefective" => Ok(ModuleKind::SystemRepair),
            "systemout" => Ok(ModuleKind::SystemOut),
            other => Err(format!("unknown module '{other}'")),
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
