//! Repository for the `assets` registry projection.

use sqlx::{PgPool, Postgres, Transaction};

use crate::models::asset::{Asset, CreateAsset};

/// Column list for assets queries.
pub(crate) const ASSET_COLUMNS: &str =
    "id, asset_code, part_code, status, origin, destination, created_at, updated_at";

/// Lookup and registration for the asset registry.
pub struct AssetRepo;

impl AssetRepo {
    /// Register an asset, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (asset_code, part_code, status, origin, destination)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.asset_code)
            .bind(&input.part_code)
            .bind(input.status.code())
            .bind(&input.origin)
            .bind(&input.destination)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by its code.
    pub async fn find_by_code(pool: &PgPool, asset_code: &str) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE asset_code = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_code)
            .fetch_optional(pool)
            .await
    }

    /// Lock an asset row inside a transaction.
    ///
    /// The scan and return sequences read-check-write the asset's status
    /// under this lock so two bookings can never both claim one asset.
    pub async fn find_by_code_for_update(
        tx: &mut Transaction<'_, Postgres>,
        asset_code: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE asset_code = $1 FOR UPDATE");
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_code)
            .fetch_optional(&mut **tx)
            .await
    }
}
