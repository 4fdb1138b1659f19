// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Internal typed event bus for live dashboard updates.
//!
//! The store publishes an event for every committed write that a dashboard
//! would want to see. Subscribers receive events in commit order. Publishing
//! never blocks and never fails: with no subscribers the event is dropped,
//! and a subscriber that falls behind by more than the channel capacity
//! observes a lag and skips ahead.

use kedai_core::{Contact, Message};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// Default number of buffered events per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// A live-update notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KedaiEvent {
    /// A message (either direction) was persisted.
    NewMessage { wa_id: String, message: Message },
    /// A contact was created or its name / last interaction changed.
    ContactUpdated { contact: Contact },
    /// At least one INCOMING message of the contact was marked read.
    MessagesRead { wa_id: String, count: usize },
}

impl KedaiEvent {
    /// Event name used on the SSE stream.
    pub fn name(&self) -> &'static str {
        match self {
            KedaiEvent::NewMessage { .. } => "new_message",
            KedaiEvent::ContactUpdated { .. } => "update_contact",
            KedaiEvent::MessagesRead { .. } => "messages_read",
        }
    }
}

/// Broadcast hub shared by the store (publisher) and the gateway (subscribers).
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<KedaiEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to every current subscriber.
    pub fn publish(&self, event: KedaiEvent) {
        let name = event.name();
        match self.tx.send(event) {
            Ok(receivers) => trace!(event = name, receivers, "event published"),
            Err(_) => trace!(event = name, "event dropped, no subscribers"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<KedaiEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
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

    fn contact(wa_id: &str) -> Contact {
        Contact {
            id: 1,
            wa_id: wa_id.to_string(),
            name: "Budi".to_string(),
            phone: wa_id.to_string(),
            last_interaction: "2026-01-01T00:00:00.000Z".to_string(),
            last_message_id: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_events_in_publish_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(KedaiEvent::ContactUpdated {
            contact: contact("628111"),
        });
        bus.publish(KedaiEvent::MessagesRead {
            wa_id: "628111".into(),
            count: 2,
        });

        assert_eq!(rx.recv().await.unwrap().name(), "update_contact");
        assert_eq!(rx.recv().await.unwrap().name(), "messages_read");
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let bus = EventBus::new(4);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(KedaiEvent::MessagesRead {
            wa_id: "1".into(),
            count: 1,
        });
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = KedaiEvent::MessagesRead {
            wa_id: "628111".into(),
            count: 3,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "messages_read");
        assert_eq!(json["count"], 3);
    }
}
