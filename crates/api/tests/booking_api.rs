//! HTTP-level integration tests for the booking lifecycle endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router.
//! Paths follow the per-module layout, e.g. `/api/v1/systemin/confirm`.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with_bus, get, post_json, post_json_as};
use serde_json::json;
use smartpack_events::EventAction;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn header_body(draft_id: &str) -> serde_json::Value {
    json!({
        "draft_id": draft_id,
        "booking_remark": "remark",
        "origin": "WH-1",
        "destination": "WH-2"
    })
}

/// Drive a booking to `HeaderSaved` over HTTP.
async fn header_saved_booking(pool: &PgPool, draft_id: &str) {
    let resp = post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/init-booking",
        json!({ "draft_id": draft_id, "objective": "monthly intake" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/generate-ref",
        json!({ "draft_id": draft_id }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/confirm",
        header_body(draft_id),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: init-booking creates a DraftNew booking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn init_booking_creates_draft(pool: PgPool) {
    let response = post_json_as(
        build_test_app(pool),
        "/api/v1/systemin/init-booking",
        json!({ "draft_id": "D-1", "objective": "monthly intake" }),
        "alice",
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["draft_id"], "D-1");
    assert_eq!(json["data"]["status"], 130);
    assert_eq!(json["data"]["refID"], serde_json::Value::Null);
    assert_eq!(json["data"]["created_by"], "alice");
}

// ---------------------------------------------------------------------------
// Test: an unknown module segment is rejected before any handler runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_module_is_bad_request(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/warehouse/init-booking",
        json!({ "draft_id": "D-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: generate-ref returns the refID envelope and publishes an event
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_ref_returns_ref_and_publishes(pool: PgPool) {
    let (app, bus) = build_test_app_with_bus(pool.clone());
    let mut rx = bus.subscribe();

    post_json(
        build_test_app(pool),
        "/api/v1/systemin/init-booking",
        json!({ "draft_id": "D-1" }),
    )
    .await;

    let response = post_json(app, "/api/v1/systemin/generate-ref", json!({ "draft_id": "D-1" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let ref_id = json["data"]["refID"].as_str().unwrap();
    assert!(ref_id.starts_with("SI-") && ref_id.ends_with("-0001"), "{ref_id}");

    let event = rx.try_recv().expect("a ref_generated event should be on the bus");
    assert_eq!(event.action, EventAction::RefGenerated);
    assert_eq!(event.channel, "systemin:update");
    assert_eq!(event.draft_id, "D-1");
    assert_eq!(event.data.unwrap()["refID"], ref_id);
}

// ---------------------------------------------------------------------------
// Test: confirm before generate-ref is a 409 REF_REQUIRED
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn confirm_without_ref_conflicts(pool: PgPool) {
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/init-booking",
        json!({ "draft_id": "D-1" }),
    )
    .await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/systemin/confirm",
        header_body("D-1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "REF_REQUIRED");
}

// ---------------------------------------------------------------------------
// Test: full lifecycle to the terminal state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn lifecycle_to_locked_terminal(pool: PgPool) {
    header_saved_booking(&pool, "D-1").await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/finalize",
        header_body("D-1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], 132);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/confirm-output",
        json!({ "draft_id": "D-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], 135);

    // Terminal bookings reject further mutation.
    let response = post_json(
        build_test_app(pool),
        "/api/v1/systemin/finalize",
        header_body("D-1"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INVALID_STATUS");
}

// ---------------------------------------------------------------------------
// Test: unlock is capability-gated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unlock_requires_capability(pool: PgPool) {
    header_saved_booking(&pool, "D-1").await;
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/finalize",
        header_body("D-1"),
    )
    .await;

    // Without the capability: 403, booking untouched.
    let response = post_json_as(
        build_test_app(pool.clone()),
        "/api/v1/systemin/unlock",
        json!({ "draft_id": "D-1" }),
        "alice",
        "scan",
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // With it: the booking reopens.
    let response = post_json_as(
        build_test_app(pool),
        "/api/v1/systemin/unlock",
        json!({ "draft_id": "D-1" }),
        "boss",
        "scan,unlock",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], 134);
    assert_eq!(json["data"]["updated_by"], "boss");
}

// ---------------------------------------------------------------------------
// Test: cancel an empty draft
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn cancel_empty_draft(pool: PgPool) {
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/init-booking",
        json!({ "draft_id": "D-1" }),
    )
    .await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/cancel",
        json!({ "draft_id": "D-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], 133);

    // Canceled bookings still show up in the module list view.
    let response = get(build_test_app(pool), "/api/v1/systemin/bookings").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: detail returns the booking + ledger snapshot, 404 on a miss
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn detail_snapshot_and_missing_draft(pool: PgPool) {
    header_saved_booking(&pool, "D-1").await;

    let response = get(
        build_test_app(pool.clone()),
        "/api/v1/systemin/detail?draft_id=D-1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["booking"]["draft_id"], "D-1");
    assert_eq!(json["booking"]["origin"], "WH-1");
    assert_eq!(json["assets"].as_array().unwrap().len(), 0);

    let response = get(
        build_test_app(pool),
        "/api/v1/systemin/detail?draft_id=D-missing",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: drafts are namespaced per module
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn draft_claimed_by_another_module_conflicts(pool: PgPool) {
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/systemin/init-booking",
        json!({ "draft_id": "D-1" }),
    )
    .await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/systemout/init-booking",
        json!({ "draft_id": "D-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}
