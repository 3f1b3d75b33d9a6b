//! Repository for the `bookings` table.
//!
//! Every state-changing operation locks the booking row
//! (`SELECT ... FOR UPDATE`), re-reads its status, validates the transition
//! against the core table, and mutates inside the same transaction. The
//! client's button gating is advisory only; these checks are authoritative.

use sqlx::{PgPool, Postgres, Transaction};
use smartpack_core::booking::{refid, transition, BookingAction, ModuleKind, TransitionError};

use crate::error::DbError;
use crate::models::booking::{Booking, HeaderRequest, InitBookingRequest};
use crate::repositories::booking_status;

/// Column list for bookings queries.
pub(crate) const BOOKING_COLUMNS: &str = "id, module, draft_id, ref_id, status, objective, \
    booking_remark, origin, destination, attendees, created_by, created_at, updated_by, updated_at";

/// CRUD and lifecycle operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Persist a client-created draft shell as `DraftNew`.
    ///
    /// Re-posting the same `draft_id` for the same module returns the
    /// existing row (offline-first clients retry init), but a `draft_id`
    /// already claimed by another module is a conflict.
    pub async fn init(
        pool: &PgPool,
        module: ModuleKind,
        input: &InitBookingRequest,
        actor: &str,
    ) -> Result<Booking, DbError> {
        let status = smartpack_core::booking::BookingStatus::DraftNew.code(module);
        let query = format!(
            "INSERT INTO bookings (module, draft_id, status, objective, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $5)
             ON CONFLICT (draft_id) DO NOTHING
             RETURNING {BOOKING_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Booking>(&query)
            .bind(module.as_str())
            .bind(&input.draft_id)
            .bind(status)
            .bind(&input.objective)
            .bind(actor)
            .fetch_optional(pool)
            .await?;

        if let Some(booking) = inserted {
            return Ok(booking);
        }

        match Self::find_by_draft(pool, module, &input.draft_id).await? {
            Some(existing) => Ok(existing),
            None => Err(DbError::Conflict(format!(
                "draft {} already belongs to another module",
                input.draft_id
            ))),
        }
    }

    /// Find a booking by module and draft id.
    pub async fn find_by_draft(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE module = $1 AND draft_id = $2"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(module.as_str())
            .bind(draft_id)
            .fetch_optional(pool)
            .await
    }

    /// List a module's bookings for its list view, newest activity first.
    pub async fn list_for_module(
        pool: &PgPool,
        module: ModuleKind,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE module = $1 ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(module.as_str())
            .fetch_all(pool)
            .await
    }

    /// Lock a booking row for the duration of a transaction. All mutations
    /// to one draft serialize on this lock.
    pub(crate) async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        module: ModuleKind,
        draft_id: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE module = $1 AND draft_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(module.as_str())
            .bind(draft_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Generate the booking's reference number, or return the existing one.
    ///
    /// Generation is idempotent once set: a second request is a no-op that
    /// returns the current value, never an error. The monthly sequence is
    /// bumped inside the booking's transaction, so concurrent generations
    /// for different bookings cannot produce the same number.
    pub async fn generate_ref(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
        actor: &str,
    ) -> Result<Booking, DbError> {
        let mut tx = pool.begin().await?;

        let booking = Self::find_for_update(&mut tx, module, draft_id)
            .await?
            .ok_or_else(|| DbError::booking_not_found(draft_id))?;

        if booking.ref_id.is_some() {
            return Ok(booking);
        }

        let status = booking_status(module, &booking)?;
        transition(status, BookingAction::GenerateRef)?;

        let period = refid::period_for(chrono::Utc::now());
        let (seq,): (i32,) = sqlx::query_as(
            "INSERT INTO ref_sequences (module, period, last_seq)
             VALUES ($1, $2, 1)
             ON CONFLICT (module, period)
             DO UPDATE SET last_seq = ref_sequences.last_seq + 1
             RETURNING last_seq",
        )
        .bind(module.as_str())
        .bind(&period)
        .fetch_one(&mut *tx)
        .await?;

        let ref_id = refid::format_ref(module, &period, seq);
        let query = format!(
            "UPDATE bookings SET ref_id = $1, updated_by = $2, updated_at = now()
             WHERE id = $3
             RETURNING {BOOKING_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(&ref_id)
            .bind(actor)
            .bind(booking.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Save the booking header (`confirm`): validates required fields and
    /// moves the booking to `HeaderSaved`.
    pub async fn save_header(
        pool: &PgPool,
        module: ModuleKind,
        input: &HeaderRequest,
        actor: &str,
    ) -> Result<Booking, DbError> {
        Self::apply_header(pool, module, input, actor, BookingAction::SaveHeader).await
    }

    /// Finalize the booking: re-validates header fields and moves to
    /// `Finalized`. Also the path that re-finalizes an unlocked booking.
    pub async fn finalize(
        pool: &PgPool,
        module: ModuleKind,
        input: &HeaderRequest,
        actor: &str,
    ) -> Result<Booking, DbError> {
        Self::apply_header(pool, module, input, actor, BookingAction::Finalize).await
    }

    async fn apply_header(
        pool: &PgPool,
        module: ModuleKind,
        input: &HeaderRequest,
        actor: &str,
        action: BookingAction,
    ) -> Result<Booking, DbError> {
        let mut tx = pool.begin().await?;

        let booking = Self::find_for_update(&mut tx, module, &input.draft_id)
            .await?
            .ok_or_else(|| DbError::booking_not_found(&input.draft_id))?;

        let status = booking_status(module, &booking)?;
        if action == BookingAction::SaveHeader && booking.ref_id.is_none() {
            return Err(TransitionError::RefRequired.into());
        }
        let next = transition(status, action)?;

        // Effective header values: request wins, existing row fills gaps.
        let remark = input.booking_remark.clone().or(booking.booking_remark);
        let origin = input.origin.clone().or(booking.origin);
        let destination = input.destination.clone().or(booking.destination);
        validate_header_fields(module, origin.as_deref(), destination.as_deref())?;

        let query = format!(
            "UPDATE bookings
             SET status = $1, booking_remark = $2, origin = $3, destination = $4,
                 updated_by = $5, updated_at = now()
             WHERE id = $6
             RETURNING {BOOKING_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(next.code(module))
            .bind(&remark)
            .bind(&origin)
            .bind(&destination)
            .bind(actor)
            .bind(booking.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Cancel a booking. Only legal before finalize and only while the scan
    /// ledger is empty; scanned assets must be returned first so the unwind
    /// stays auditable.
    pub async fn cancel(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
        actor: &str,
    ) -> Result<Booking, DbError> {
        Self::apply_status_change(pool, module, draft_id, actor, BookingAction::Cancel).await
    }

    /// Reopen a finalized booking for correction.
    pub async fn unlock(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
        actor: &str,
    ) -> Result<Booking, DbError> {
        Self::apply_status_change(pool, module, draft_id, actor, BookingAction::Unlock).await
    }

    /// Hard-finalize a booking from the list view (`confirm-output`).
    pub async fn confirm_output(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
        actor: &str,
    ) -> Result<Booking, DbError> {
        Self::apply_status_change(pool, module, draft_id, actor, BookingAction::ConfirmOutput).await
    }

    async fn apply_status_change(
        pool: &PgPool,
        module: ModuleKind,
        draft_id: &str,
        actor: &str,
        action: BookingAction,
    ) -> Result<Booking, DbError> {
        let mut tx = pool.begin().await?;

        let booking = Self::find_for_update(&mut tx, module, draft_id)
            .await?
            .ok_or_else(|| DbError::booking_not_found(draft_id))?;

        let status = booking_status(module, &booking)?;
        let next = transition(status, action)?;

        if action == BookingAction::Cancel && booking.attendees > 0 {
            return Err(TransitionError::NotCancelable {
                attendees: booking.attendees,
            }
            .into());
        }

        let query = format!(
            "UPDATE bookings SET status = $1, updated_by = $2, updated_at = now()
             WHERE id = $3
             RETURNING {BOOKING_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(next.code(module))
            .bind(actor)
            .bind(booking.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}

/// Required header fields per module: the location pair for the modules that
/// move assets between locations; the repair intake needs neither.
fn validate_header_fields(
    module: ModuleKind,
    origin: Option<&str>,
    destination: Option<&str>,
) -> Result<(), TransitionError> {
    let mut missing = Vec::new();
    if matches!(module, ModuleKind::SystemIn | ModuleKind::SystemOut) {
        if origin.map_or(true, |s| s.trim().is_empty()) {
            missing.push("origin");
        }
        if destination.map_or(true, |s| s.trim().is_empty()) {
            missing.push("destination");
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TransitionError::MissingHeaderFields(missing.join(", ")))
    }
}
