//! Handlers for scan and return.
//!
//! The scan endpoint never answers non-2xx for a guard rejection: the
//! handheld clients interpret transport errors as "retry", which would
//! double-fire the scan. Outcomes travel in the body envelope instead.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use smartpack_core::booking::ModuleKind;
use smartpack_db::models::booking::{ReturnRequest, ReturnSingleRequest, ScanRequest};
use smartpack_db::repositories::{ReturnSelector, ScanRepo};
use smartpack_db::DbError;
use smartpack_events::{BookingEvent, EventAction};

use crate::error::AppResult;
use crate::middleware::Actor;
use crate::response::{ScanRejected, SuccessResponse};
use crate::state::AppState;

/// POST /api/v1/{module}/scan
///
/// Success: `{ "success": true, "data": <ledger entry> }`.
/// Guard rejection: HTTP 200 with `{ "success": false, "code", ... }`;
/// `ALREADY_SCANNED` is the re-scan toggle, after which the client calls
/// `return-single` to undo.
pub async fn scan(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<ScanRequest>,
) -> AppResult<Response> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    match ScanRepo::record_scan(
        &state.pool,
        module,
        &input.draft_id,
        &input.qr_string,
        &actor.name,
    )
    .await
    {
        Ok(entry) => {
            let mut event = BookingEvent::new(module, EventAction::Scan, &input.draft_id);
            if let Ok(data) = serde_json::to_value(&entry) {
                event = event.with_data(data);
            }
            state.event_bus.publish(event);
            Ok(Json(SuccessResponse::new(entry)).into_response())
        }
        Err(DbError::Scan(rejection)) => {
            tracing::info!(
                module = %module,
                draft_id = %input.draft_id,
                code = %rejection.code(),
                "Scan rejected"
            );
            Ok(Json(ScanRejected::from(&rejection)).into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// POST /api/v1/{module}/return -- bulk return by ledger entry ids.
pub async fn return_assets(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<ReturnRequest>,
) -> AppResult<Json<SuccessResponse<Vec<smartpack_db::models::booking::ScanEntry>>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let selector = ReturnSelector::Ids(input.ids.clone());
    let entries =
        ScanRepo::return_entries(&state.pool, module, &input.draft_id, &selector, &actor.name)
            .await?;

    publish_return(&state, module, &input.draft_id, &entries);
    Ok(Json(SuccessResponse::new(entries)))
}

/// POST /api/v1/{module}/return-single -- return one asset by its code.
pub async fn return_single(
    State(state): State<AppState>,
    Path(module): Path<ModuleKind>,
    actor: Actor,
    Json(input): Json<ReturnSingleRequest>,
) -> AppResult<Json<SuccessResponse<Vec<smartpack_db::models::booking::ScanEntry>>>> {
    let _guard = state.draft_locks.acquire(&input.draft_id).await;

    let selector = ReturnSelector::AssetCode(input.asset_code.clone());
    let entries =
        ScanRepo::return_entries(&state.pool, module, &input.draft_id, &selector, &actor.name)
            .await?;

    publish_return(&state, module, &input.draft_id, &entries);
    Ok(Json(SuccessResponse::new(entries)))
}

fn publish_return(
    state: &AppState,
    module: ModuleKind,
    draft_id: &str,
    entries: &[smartpack_db::models::booking::ScanEntry],
) {
    let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
    state.event_bus.publish(
        BookingEvent::new(module, EventAction::Return, draft_id).with_data(json!({ "ids": ids })),
    );
}
