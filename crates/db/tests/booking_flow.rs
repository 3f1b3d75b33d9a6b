//! Repository-level tests for the booking lifecycle: init, reference
//! generation, header save, finalize/unlock, cancel.

use sqlx::PgPool;
use smartpack_core::booking::{BookingStatus, ModuleKind, TransitionError};
use smartpack_db::models::booking::{HeaderRequest, InitBookingRequest};
use smartpack_db::repositories::BookingRepo;
use smartpack_db::DbError;

const MODULE: ModuleKind = ModuleKind::SystemIn;

fn init_req(draft_id: &str) -> InitBookingRequest {
    InitBookingRequest {
        draft_id: draft_id.to_string(),
        objective: Some("monthly intake".to_string()),
    }
}

fn header_req(draft_id: &str) -> HeaderRequest {
    HeaderRequest {
        draft_id: draft_id.to_string(),
        booking_remark: Some("remark".to_string()),
        origin: Some("WH-1".to_string()),
        destination: Some("WH-2".to_string()),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn init_creates_draft_new(pool: PgPool) {
    let booking = BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();

    assert_eq!(booking.draft_id, "D-1");
    assert_eq!(booking.status, 130);
    assert_eq!(booking.status_enum(), Some(BookingStatus::DraftNew));
    assert_eq!(booking.ref_id, None);
    assert_eq!(booking.attendees, 0);
    assert_eq!(booking.created_by, "alice");
}

#[sqlx::test(migrations = "./migrations")]
async fn init_is_idempotent_per_module(pool: PgPool) {
    let first = BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();
    let second = BookingRepo::init(&pool, MODULE, &init_req("D-1"), "bob")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.created_by, "alice");
}

#[sqlx::test(migrations = "./migrations")]
async fn init_rejects_draft_claimed_by_another_module(pool: PgPool) {
    BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();

    let err = BookingRepo::init(&pool, ModuleKind::SystemOut, &init_req("D-1"), "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// generate-ref
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn generate_ref_is_idempotent(pool: PgPool) {
    BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();

    let first = BookingRepo::generate_ref(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap();
    let ref_id = first.ref_id.clone().unwrap();
    assert!(ref_id.starts_with("SI-"), "{ref_id}");
    assert!(ref_id.ends_with("-0001"), "{ref_id}");

    let second = BookingRepo::generate_ref(&pool, MODULE, "D-1", "bob")
        .await
        .unwrap();
    assert_eq!(second.ref_id.as_deref(), Some(ref_id.as_str()));
}

#[sqlx::test(migrations = "./migrations")]
async fn refs_are_sequential_per_module(pool: PgPool) {
    BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();
    BookingRepo::init(&pool, MODULE, &init_req("D-2"), "alice")
        .await
        .unwrap();
    BookingRepo::init(&pool, ModuleKind::SystemRepair, &init_req("D-3"), "alice")
        .await
        .unwrap();

    let a = BookingRepo::generate_ref(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap();
    let b = BookingRepo::generate_ref(&pool, MODULE, "D-2", "alice")
        .await
        .unwrap();
    let c = BookingRepo::generate_ref(&pool, ModuleKind::SystemRepair, "D-3", "alice")
        .await
        .unwrap();

    assert!(a.ref_id.unwrap().ends_with("-0001"));
    assert!(b.ref_id.unwrap().ends_with("-0002"));
    // The repair module runs its own counter.
    let c_ref = c.ref_id.unwrap();
    assert!(c_ref.starts_with("SD-") && c_ref.ends_with("-0001"), "{c_ref}");
}

#[sqlx::test(migrations = "./migrations")]
async fn generate_ref_for_unknown_draft_is_not_found(pool: PgPool) {
    let err = BookingRepo::generate_ref(&pool, MODULE, "D-missing", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// confirm (header save)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn confirm_requires_a_ref(pool: PgPool) {
    BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();

    let err = BookingRepo::save_header(&pool, MODULE, &header_req("D-1"), "alice")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Transition(TransitionError::RefRequired)
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn confirm_requires_location_pair_for_system_in(pool: PgPool) {
    BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();
    BookingRepo::generate_ref(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap();

    let mut req = header_req("D-1");
    req.destination = None;
    let err = BookingRepo::save_header(&pool, MODULE, &req, "alice")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Transition(TransitionError::MissingHeaderFields(ref f)) if f == "destination"
    ));

    // Nothing was mutated.
    let booking = BookingRepo::find_by_draft(&pool, MODULE, "D-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking.status_enum(), Some(BookingStatus::DraftNew));
}

#[sqlx::test(migrations = "./migrations")]
async fn confirm_moves_to_header_saved(pool: PgPool) {
    BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();
    BookingRepo::generate_ref(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap();

    let booking = BookingRepo::save_header(&pool, MODULE, &header_req("D-1"), "alice")
        .await
        .unwrap();
    assert_eq!(booking.status, 131);
    assert_eq!(booking.origin.as_deref(), Some("WH-1"));
    assert_eq!(booking.destination.as_deref(), Some("WH-2"));
}

// ---------------------------------------------------------------------------
// finalize / unlock / confirm-output
// ---------------------------------------------------------------------------

async fn header_saved_booking(pool: &PgPool, draft_id: &str) {
    BookingRepo::init(pool, MODULE, &init_req(draft_id), "alice")
        .await
        .unwrap();
    BookingRepo::generate_ref(pool, MODULE, draft_id, "alice")
        .await
        .unwrap();
    BookingRepo::save_header(pool, MODULE, &header_req(draft_id), "alice")
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn finalize_unlock_refinalize_lock(pool: PgPool) {
    header_saved_booking(&pool, "D-1").await;

    let booking = BookingRepo::finalize(&pool, MODULE, &header_req("D-1"), "alice")
        .await
        .unwrap();
    assert_eq!(booking.status_enum(), Some(BookingStatus::Finalized));

    let booking = BookingRepo::unlock(&pool, MODULE, "D-1", "boss")
        .await
        .unwrap();
    assert_eq!(booking.status_enum(), Some(BookingStatus::UnlockedForEdit));
    // The ref survives the unlock; no new number is fabricated.
    assert!(booking.ref_id.is_some());

    let booking = BookingRepo::finalize(&pool, MODULE, &header_req("D-1"), "alice")
        .await
        .unwrap();
    assert_eq!(booking.status_enum(), Some(BookingStatus::Finalized));

    let booking = BookingRepo::confirm_output(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap();
    assert_eq!(booking.status_enum(), Some(BookingStatus::LockedTerminal));

    // Terminal: nothing moves it again.
    let err = BookingRepo::unlock(&pool, MODULE, "D-1", "boss")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Transition(TransitionError::InvalidState { .. })
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn unlock_requires_finalized(pool: PgPool) {
    header_saved_booking(&pool, "D-1").await;

    let err = BookingRepo::unlock(&pool, MODULE, "D-1", "boss")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Transition(TransitionError::InvalidState { .. })
    ));
}

// ---------------------------------------------------------------------------
// cancel
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn cancel_empty_draft_is_terminal(pool: PgPool) {
    BookingRepo::init(&pool, MODULE, &init_req("D-1"), "alice")
        .await
        .unwrap();

    let booking = BookingRepo::cancel(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap();
    assert_eq!(booking.status_enum(), Some(BookingStatus::Canceled));

    let err = BookingRepo::cancel(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Transition(TransitionError::InvalidState { .. })
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn header_resave_after_unlock_cannot_reach_cancel(pool: PgPool) {
    header_saved_booking(&pool, "D-1").await;
    BookingRepo::finalize(&pool, MODULE, &header_req("D-1"), "alice")
        .await
        .unwrap();
    BookingRepo::unlock(&pool, MODULE, "D-1", "boss")
        .await
        .unwrap();

    // Re-saving the header during the unlock detour keeps the booking
    // unlocked; it does not demote it to a cancelable state.
    let booking = BookingRepo::save_header(&pool, MODULE, &header_req("D-1"), "alice")
        .await
        .unwrap();
    assert_eq!(booking.status_enum(), Some(BookingStatus::UnlockedForEdit));

    let err = BookingRepo::cancel(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Transition(TransitionError::InvalidState { .. })
    ));
}

#[sqlx::test(migrations = "./migrations")]
async fn cancel_after_finalize_is_rejected(pool: PgPool) {
    header_saved_booking(&pool, "D-1").await;
    BookingRepo::finalize(&pool, MODULE, &header_req("D-1"), "alice")
        .await
        .unwrap();

    let err = BookingRepo::cancel(&pool, MODULE, "D-1", "alice")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Transition(TransitionError::InvalidState { .. })
    ));
}
