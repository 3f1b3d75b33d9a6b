//! Handlers for the booking lifecycle endpoints.
//!
//! Every state-changing handler follows the same sequence: acquire the
//! draft's lock, run the repository operation, publish the event, answer.
//! Holding the lock across the publish keeps one draft's events in commit
//! order on the bus.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::json;
use smartpack_core::booking::ModuleKind;
use smartpack_core::error::CoreError;
use smartpack_db::models::booking::{
    Booking, BookingDetail, DraftQuery, DraftRequest, HeaderRequest, InitBookingRequest,
};
use smartpack_db::repositories::{BookingRepo, ScanRepo};
use smartpack_events::{BookingEvent, EventAction};

use crate::error::{AppError, AppResult};
use crate::middleware::actor::{Actor, CAP_UNLOCK};
use crate::response::{DataResponse, SuccessResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Draft creation and reads
// ---------------------------------------------------------------------------

/// POST /api/v1/{module}/init-booking
///
/// Persists a client-created draft shell. Idempotent per module: replaying
/// the same `draft_id` returns the existing booking unchanged.
pub async fn init_booking(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<InitBookingRequest>,
) -> AppResult<Json<SuccessResponse<Booking>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let booking = BookingRepo::init(&state.pool, module, &input, &actor.name).await?;

    tracing::info!(module = %module, draft_id = %input.draft_id, "Booking initialized");
    Ok(Json(SuccessResponse::new(booking)))
}

/// GET /api/v1/{module}/detail?draft_id=
pub async fn booking_detail(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    Query(query): Query<DraftQuery>,
) -> AppResult<Json<BookingDetail>> {
    let booking = BookingRepo::find_by_draft(&state.pool, module, &query.draft_id)
        .await?
        .ok_or_else(|| booking_not_found(&query.draft_id))?;
    let assets = ScanRepo::list_for_booking(&state.pool, booking.id).await?;

    Ok(Json(BookingDetail { booking, assets }))
}

/// GET /api/v1/{module}/list?draft_id= -- the booking's scan ledger.
pub async fn ledger_list(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    Query(query): Query<DraftQuery>,
) -> AppResult<Json<DataResponse<Vec<smartpack_db::models::booking::ScanEntry>>>> {
    let booking = BookingRepo::find_by_draft(&state.pool, module, &query.draft_id)
        .await?
        .ok_or_else(|| booking_not_found(&query.draft_id))?;
    let entries = ScanRepo::list_for_booking(&state.pool, booking.id).await?;

    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/{module}/bookings -- the module's list view.
pub async fn booking_list(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list_for_module(&state.pool, module).await?;
    Ok(Json(DataResponse { data: bookings }))
}

// ---------------------------------------------------------------------------
// Reference generation
// ---------------------------------------------------------------------------

/// POST /api/v1/{module}/generate-ref
pub async fn generate_ref(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<DraftRequest>,
) -> AppResult<Json<SuccessResponse<Booking>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let booking = BookingRepo::generate_ref(&state.pool, module, &input.draft_id, &actor.name)
        .await?;

    state.event_bus.publish(
        BookingEvent::new(module, EventAction::RefGenerated, &input.draft_id)
            .with_data(json!({ "refID": booking.ref_id })),
    );
    Ok(Json(SuccessResponse::new(booking)))
}

// ---------------------------------------------------------------------------
// Header save / finalize
// ---------------------------------------------------------------------------

/// POST /api/v1/{module}/confirm -- save the booking header.
pub async fn confirm_header(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<HeaderRequest>,
) -> AppResult<Json<SuccessResponse<Booking>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let booking = BookingRepo::save_header(&state.pool, module, &input, &actor.name).await?;

    state.event_bus.publish(
        BookingEvent::new(module, EventAction::HeaderUpdate, &input.draft_id)
            .with_data(json!({ "status": booking.status })),
    );
    Ok(Json(SuccessResponse::new(booking)))
}

/// POST /api/v1/{module}/finalize
pub async fn finalize(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<HeaderRequest>,
) -> AppResult<Json<SuccessResponse<Booking>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let booking = BookingRepo::finalize(&state.pool, module, &input, &actor.name).await?;

    state.event_bus.publish(
        BookingEvent::new(module, EventAction::Finalized, &input.draft_id)
            .with_data(json!({ "status": booking.status, "refID": booking.ref_id })),
    );
    tracing::info!(module = %module, draft_id = %input.draft_id, "Booking finalized");
    Ok(Json(SuccessResponse::new(booking)))
}

// ---------------------------------------------------------------------------
// Unlock / cancel / confirm-output
// ---------------------------------------------------------------------------

/// POST /api/v1/{module}/unlock -- reopen a finalized booking.
///
/// Requires the `unlock` capability; the floor gateway grants it to
/// supervisors only.
pub async fn unlock(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<DraftRequest>,
) -> AppResult<Json<SuccessResponse<Booking>>> {
    if !actor.can(CAP_UNLOCK) {
        return Err(AppError::Core(CoreError::Forbidden(
            "the unlock capability is required to reopen a finalized booking".to_string(),
        )));
    }

    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let booking = BookingRepo::unlock(&state.pool, module, &input.draft_id, &actor.name).await?;

    state.event_bus.publish(
        BookingEvent::new(module, EventAction::Unlocked, &input.draft_id)
            .with_data(json!({ "status": booking.status })),
    );
    tracing::info!(module = %module, draft_id = %input.draft_id, actor = %actor.name, "Booking unlocked");
    Ok(Json(SuccessResponse::new(booking)))
}

/// POST /api/v1/{module}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<DraftRequest>,
) -> AppResult<Json<SuccessResponse<Booking>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let booking = BookingRepo::cancel(&state.pool, module, &input.draft_id, &actor.name).await?;

    state
        .event_bus
        .publish(BookingEvent::new(module, EventAction::Cancel, &input.draft_id));
    tracing::info!(module = %module, draft_id = %input.draft_id, "Booking canceled");
    Ok(Json(SuccessResponse::new(booking)))
}

/// POST /api/v1/{module}/confirm-output -- hard-finalize from the list view.
pub async fn confirm_output(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<DraftRequest>,
) -> AppResult<Json<SuccessResponse<Booking>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let booking =
        BookingRepo::confirm_output(&state.pool, module, &input.draft_id, &actor.name).await?;

    state.event_bus.publish(
        BookingEvent::new(module, EventAction::OutputConfirmed, &input.draft_id)
            .with_data(json!({ "status": booking.status })),
    );
    tracing::info!(module = %module, draft_id = %input.draft_id, "Booking output confirmed");
    Ok(Json(SuccessResponse::new(booking)))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn booking_not_found(draft_id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Booking",
        id: draft_id.to_string(),
    })
}
