//! Event bus and the event envelope it carries.
//!
//! Share one [`EventBus`] via `Arc<EventBus>` between the repositories that
//! publish and the services that observe.

use chrono::{DateTime, Utc};
use dialogue_core::types::EntityId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const CHARACTER_SAVED: &str = "character.saved";
pub const CHARACTER_DELETED: &str = "character.deleted";
pub const CHARACTERS_IMPORTED: &str = "characters.imported";
pub const SETTINGS_SAVED: &str = "settings.saved";

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// Something that changed in the persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name, e.g. `"character.saved"`.
    pub event_type: String,

    /// Id of the record the event concerns, if any.
    pub source_entity_id: Option<EntityId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.source_entity_id = Some(entity_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus: every subscriber sees every event published after it
/// subscribed.
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Slow receivers that fall more than `capacity` events behind observe
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Returns immediately; an event
    /// with no subscribers is dropped.
    pub fn publish(&self, event: DomainEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            DomainEvent::new(CHARACTER_SAVED)
                .with_source("char_1")
                .with_payload(serde_json::json!({"name": "Al"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, CHARACTER_SAVED);
        assert_eq!(received.source_entity_id.as_deref(), Some("char_1"));
        assert_eq!(received.payload["name"], "Al");
    }

    #[tokio::test]
    async fn every_subscriber_sees_the_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(DomainEvent::new(SETTINGS_SAVED));

        assert_eq!(rx1.recv().await.unwrap().event_type, SETTINGS_SAVED);
        assert_eq!(rx2.recv().await.unwrap().event_type, SETTINGS_SAVED);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        EventBus::default().publish(DomainEvent::new(CHARACTER_DELETED));
    }

    #[test]
    fn new_event_has_empty_payload_and_no_source() {
        let event = DomainEvent::new("bare");
        assert!(event.source_entity_id.is_none());
        assert!(event.payload.is_object());
    }
}
