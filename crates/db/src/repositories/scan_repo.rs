//! Repository for the `booking_scans` ledger.
//!
//! The scan and return sequences are the contended paths of the workflow:
//! both run in a single transaction holding `FOR UPDATE` locks on the
//! booking row (serializing all mutations to one draft) and on the asset
//! row (so the status guard and the status mutation are atomic per asset,
//! and two bookings can never both claim the same box).

use sqlx::{PgPool, Postgres, Transaction};
use smartpack_core::asset::AssetStatus;
use smartpack_core::booking::scan::{self, ScanAsset, ScanBooking};
use smartpack_core::booking::{transition, BookingAction, ModuleKind, ScanRejection};
use smartpack_core::types::DbId;

use crate::error::DbError;
use crate::models::asset::Asset;
use crate::models::booking::{Booking, ScanEntry};
use crate::repositories::asset_repo::AssetRepo;
use crate::repositories::booking_repo::BookingRepo;
use crate::repositories::booking_status;

/// Column list for booking_scans queries.
pub(crate) const SCAN_COLUMNS: &str = "id, booking_id, asset_code, part_code, status_name, \
    status_class, prev_status, prev_origin, prev_destination, scan_by, scan_at";

/// Which ledger entries a return targets.
#[derive(Debug, Clone)]
pub enum ReturnSelector {
    /// Ledger entry ids from the bulk `return` endpoint.
    Ids(Vec<DbId>),
    /// A single asset code from `return-single` (also the undo path after
    /// an `ALREADY_SCANNED` toggle).
    AssetCode(String),
}

/// Ledger operations: scan, return, list.
pub struct ScanRepo;

impl ScanRepo {
    /// List a booking's ledger, oldest scan first.
    pub async fn list_for_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Vec<ScanEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {SCAN_COLUMNS} FROM booking_scans WHERE booking_id = $1 ORDER BY scan_at ASC"
        );
        sqlx::query_as::<_, ScanEntry>(&query)
            .bind(booking_id)
            .fetch_all(pool)
            .await
    }

    /// Validate and record one scan.
    ///
    /// Normalizes the payload, locks the booking and asset rows, evaluates
    /// the guard chain, then inserts the ledger entry, transitions the
    /// asset, and recomputes `attendees`, all in one transaction. A guard
    /// rejection rolls everything back and surfaces as
    /// [`DbError::Scan`].
    pub async fn record_scan(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
        raw_payload: &str,
        actor: &str,
    ) -> Result<ScanEntry, DbError> {
        let normalized = scan::normalize_payload(raw_payload);
        let asset_code = scan::asset_code_from_payload(&normalized).to_string();
        if asset_code.is_empty() {
            return Err(ScanRejection::UnknownAsset { asset_code }.into());
        }

        let mut tx = pool.begin().await?;

        let booking = BookingRepo::find_for_update(&mut tx, module, draft_id)
            .await?
            .ok_or_else(|| DbError::booking_not_found(draft_id))?;
        let status = booking_status(module, &booking)?;

        let already: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM booking_scans WHERE booking_id = $1 AND asset_code = $2")
                .bind(booking.id)
                .bind(&asset_code)
                .fetch_optional(&mut *tx)
                .await?;

        let asset = AssetRepo::find_by_code_for_update(&mut tx, &asset_code).await?;
        let asset_status = match &asset {
            Some(a) => Some(decode_asset_status(a)?),
            None => None,
        };

        let booking_view = ScanBooking {
            status,
            ref_id: booking.ref_id.as_deref(),
            origin: booking.origin.as_deref(),
        };
        let asset_view = asset.as_ref().zip(asset_status).map(|(a, s)| ScanAsset {
            status: s,
            destination: a.destination.as_deref(),
        });

        scan::validate_scan(
            module,
            &booking_view,
            asset_view.as_ref(),
            already.is_some(),
            &asset_code,
        )?;
        transition(status, BookingAction::Scan)?;

        // Guards passed, so the asset exists and decoded.
        let asset = asset.ok_or_else(|| ScanRejection::UnknownAsset {
            asset_code: asset_code.clone(),
        })?;
        let target = module.target_asset_status();

        let query = format!(
            "INSERT INTO booking_scans
                (booking_id, asset_code, part_code, status_name, status_class,
                 prev_status, prev_origin, prev_destination, scan_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {SCAN_COLUMNS}"
        );
        let entry = sqlx::query_as::<_, ScanEntry>(&query)
            .bind(booking.id)
            .bind(&asset.asset_code)
            .bind(&asset.part_code)
            .bind(target.name())
            .bind(target.class())
            .bind(asset.status)
            .bind(&asset.origin)
            .bind(&asset.destination)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await?;

        if module.stamps_location() {
            sqlx::query(
                "UPDATE assets SET status = $1, origin = $2, destination = $3, updated_at = now()
                 WHERE id = $4",
            )
            .bind(target.code())
            .bind(&booking.origin)
            .bind(&booking.destination)
            .bind(asset.id)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query("UPDATE assets SET status = $1, updated_at = now() WHERE id = $2")
                .bind(target.code())
                .bind(asset.id)
                .execute(&mut *tx)
                .await?;
        }

        recompute_attendees(&mut tx, booking.id, actor).await?;

        tx.commit().await?;

        tracing::info!(
            module = %module,
            draft_id = %draft_id,
            asset_code = %entry.asset_code,
            "Asset scanned"
        );
        Ok(entry)
    }

    /// Remove ledger entries and revert the underlying assets to their
    /// pre-scan registry state.
    pub async fn return_entries(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
        selector: &ReturnSelector,
        actor: &str,
    ) -> Result<Vec<ScanEntry>, DbError> {
        let mut tx = pool.begin().await?;

        let booking = BookingRepo::find_for_update(&mut tx, module, draft_id)
            .await?
            .ok_or_else(|| DbError::booking_not_found(draft_id))?;
        let status = booking_status(module, &booking)?;
        transition(status, BookingAction::Return)?;

        let entries = fetch_entries(&mut tx, &booking, selector).await?;
        if entries.is_empty() {
            return Err(DbError::NotFound {
                entity: "ScanEntry",
                id: selector_id(selector),
            });
        }

        for entry in &entries {
            // Lock the asset before reverting; another booking could be
            // scanning it this instant.
            AssetRepo::find_by_code_for_update(&mut tx, &entry.asset_code).await?;
            sqlx::query(
                "UPDATE assets SET status = $1, origin = $2, destination = $3, updated_at = now()
                 WHERE asset_code = $4",
            )
            .bind(entry.prev_status)
            .bind(&entry.prev_origin)
            .bind(&entry.prev_destination)
            .bind(&entry.asset_code)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM booking_scans WHERE id = $1")
                .bind(entry.id)
                .execute(&mut *tx)
                .await?;
        }

        recompute_attendees(&mut tx, booking.id, actor).await?;

        tx.commit().await?;

        tracing::info!(
            module = %module,
            draft_id = %draft_id,
            count = entries.len(),
            "Assets returned"
        );
        Ok(entries)
    }
}

async fn fetch_entries(
    tx: &mut Transaction<'_, Postgres>,
    booking: &Booking,
    selector: &ReturnSelector,
) -> Result<Vec<ScanEntry>, sqlx::Error> {
    match selector {
        ReturnSelector::Ids(ids) => {
            let query = format!(
                "SELECT {SCAN_COLUMNS} FROM booking_scans
                 WHERE booking_id = $1 AND id = ANY($2)"
            );
            sqlx::query_as::<_, ScanEntry>(&query)
                .bind(booking.id)
                .bind(ids)
                .fetch_all(&mut **tx)
                .await
        }
        ReturnSelector::AssetCode(asset_code) => {
            let query = format!(
                "SELECT {SCAN_COLUMNS} FROM booking_scans
                 WHERE booking_id = $1 AND asset_code = $2"
            );
            sqlx::query_as::<_, ScanEntry>(&query)
                .bind(booking.id)
                .bind(asset_code)
                .fetch_all(&mut **tx)
                .await
        }
    }
}

/// Keep the denormalized `attendees` count equal to the live ledger count.
async fn recompute_attendees(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: DbId,
    actor: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE bookings
         SET attendees = (SELECT COUNT(*) FROM booking_scans WHERE booking_id = $1),
             updated_by = $2, updated_at = now()
         WHERE id = $1",
    )
    .bind(booking_id)
    .bind(actor)
    .execute(&mut **tx)
    .await
    .map(|_| ())
}

fn decode_asset_status(asset: &Asset) -> Result<AssetStatus, DbError> {
    AssetStatus::from_code(asset.status).ok_or(DbError::CorruptAssetStatus {
        asset_code: asset.asset_code.clone(),
        code: asset.status,
    })
}

fn selector_id(selector: &ReturnSelector) -> String {
    match selector {
        ReturnSelector::Ids(ids) => ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(","),
        ReturnSelector::AssetCode(code) => code.clone(),
    }
}
