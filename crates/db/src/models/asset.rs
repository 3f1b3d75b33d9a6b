//! Asset registry row model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use smartpack_core::asset::AssetStatus;
use smartpack_core::types::{DbId, Timestamp};

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub asset_code: String,
    pub part_code: Option<String>,
    /// Numeric status code; decode with [`Asset::status_enum`].
    pub status: i16,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    /// Decode the persisted status code.
    pub fn status_enum(&self) -> Option<AssetStatus> {
        AssetStatus::from_code(self.status)
    }
}

/// DTO for registering an asset in the registry projection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub asset_code: String,
    pub part_code: Option<String>,
    pub status: AssetStatus,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// Query string for the asset lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetLookup {
    pub asset_code: String,
}
