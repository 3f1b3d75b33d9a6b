//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`BookingEvent`]s. Every
//! committed booking mutation publishes exactly one event; the API crate's
//! broadcaster task subscribes and fans events out to all WebSocket
//! sessions, which filter by `draft_id` themselves. Publishing happens
//! inside the per-draft critical section, so subscribers observe events for
//! one draft in commit order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use smartpack_core::booking::ModuleKind;

// ---------------------------------------------------------------------------
// BookingEvent
// ---------------------------------------------------------------------------

/// What happened to a booking. Clients interpret the action to decide
/// whether to close their view (`Cancel`, `Finalized`, `OutputConfirmed`),
/// silently re-fetch detail (`HeaderUpdate`, `Unlocked`, `RefGenerated`),
/// or apply an incremental update (`Scan`, `Return`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Scan,
    Return,
    HeaderUpdate,
    RefGenerated,
    Finalized,
    Unlocked,
    Cancel,
    OutputConfirmed,
}

/// A state-change notification for one booking.
///
/// Constructed via [`BookingEvent::new`] and optionally enriched with
/// [`with_data`](BookingEvent::with_data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Module topic the event belongs to, e.g. `"systemin:update"`.
    pub channel: String,

    /// What happened.
    pub action: EventAction,

    /// The booking the event is about. Clients filter on this.
    pub draft_id: String,

    /// Optional action-specific payload (the scanned row, the new refID, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// When the mutation committed (UTC).
    pub timestamp: DateTime<Utc>,
}

impl BookingEvent {
    /// Create an event for `module` / `action` about `draft_id`.
    pub fn new(module: ModuleKind, action: EventAction, draft_id: impl Into<String>) -> Self {
        Self {
            channel: module.channel().to_string(),
            action,
            draft_id: draft_id.into(),
            data: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach an action-specific payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers independently
/// receive every published [`BookingEvent`]. Designed to be shared via
/// `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<BookingEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// A publish with zero subscribers is fine: the mutation is already
    /// committed and the broadcast is best-effort.
    pub fn publish(&self, event: BookingEvent) {
        tracing::debug!(
            channel = %event.channel,
            action = ?event.action,
            draft_id = %event.draft_id,
            "publishing booking event"
        );
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = BookingEvent::new(ModuleKind::SystemIn, EventAction::Scan, "D-ABC123")
            .with_data(serde_json::json!({"asset_code": "BX-0001"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.channel, "systemin:update");
        assert_eq!(received.action, EventAction::Scan);
        assert_eq!(received.draft_id, "D-ABC123");
        assert_eq!(received.data.unwrap()["asset_code"], "BX-0001");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(BookingEvent::new(
            ModuleKind::SystemRepair,
            EventAction::Finalized,
            "D-1",
        ));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.channel, "systemdefective:update");
        assert_eq!(e2.draft_id, "D-1");
    }

    #[tokio::test]
    async fn events_for_one_draft_arrive_in_publish_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        for action in [
            EventAction::RefGenerated,
            EventAction::HeaderUpdate,
            EventAction::Scan,
            EventAction::Finalized,
        ] {
            bus.publish(BookingEvent::new(ModuleKind::SystemIn, action, "D-1"));
        }

        assert_eq!(rx.recv().await.unwrap().action, EventAction::RefGenerated);
        assert_eq!(rx.recv().await.unwrap().action, EventAction::HeaderUpdate);
        assert_eq!(rx.recv().await.unwrap().action, EventAction::Scan);
        assert_eq!(rx.recv().await.unwrap().action, EventAction::Finalized);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(BookingEvent::new(
            ModuleKind::SystemOut,
            EventAction::Cancel,
            "D-orphan",
        ));
    }

    #[test]
    fn event_serializes_without_null_data() {
        let event = BookingEvent::new(ModuleKind::SystemIn, EventAction::Unlocked, "D-1");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "unlocked");
        assert!(json.get("data").is_none());
    }
}
