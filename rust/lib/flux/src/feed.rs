use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::trie::Trie;
use crate::value::{StateValue, SubscriptionId};

/// Callback type for event delivery.
pub type EventHandler = Arc<dyn Fn(&str, &StateValue) + Send + Sync>;

/// Synchronous Trie-routed pub/sub for row-level change events.
///
/// Unlike [`crate::StateStore`], an `EventFeed` does not retain anything:
/// `publish` delivers the event to every handler whose pattern matches the
/// topic, then drops it. Events are a stream, not state.
///
/// Delivery is synchronous on the publisher's thread; handlers must not
/// block. If no handler matches, publishing is a silent no-op.
///
/// Topics use the same `/`-separated namespace and MQTT-style wildcard
/// patterns (`+`, `#`) as the rest of flux:
///
/// ```ignore
/// let feed = EventFeed::new();
/// feed.subscribe("changes/items/#", |topic, event| { /* merge */ });
/// feed.publish("changes/items/41", change);
/// ```
pub struct EventFeed {
    handlers: Trie<HandlerEntry>,
    next_id: AtomicU64,
}

#[derive(Clone)]
struct HandlerEntry {
    id: SubscriptionId,
    handler: EventHandler,
}

impl EventFeed {
    /// Create a new feed with no subscribers.
    pub fn new() -> Self {
        Self {
            handlers: Trie::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Publish a typed event to all handlers matching the topic.
    pub fn publish<T: Any + Send + Sync>(&self, topic: &str, event: T) {
        self.publish_value(topic, StateValue::new(event));
    }

    /// Publish a pre-built `StateValue` event.
    pub fn publish_value(&self, topic: &str, event: StateValue) {
        let entries = self.handlers.match_topic(topic);
        for entry in entries {
            (entry.handler)(topic, &event);
        }
    }

    /// Subscribe to events matching the given Trie pattern.
    ///
    /// Returns a `SubscriptionId` for [`EventFeed::unsubscribe`].
    pub fn subscribe<F>(&self, pattern: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&str, &StateValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = HandlerEntry {
            id,
            handler: Arc::new(handler),
        };
        self.handlers.insert(pattern, entry);
        id
    }

    /// Unsubscribe a handler by its subscription ID and pattern.
    pub fn unsubscribe(&self, pattern: &str, id: SubscriptionId) {
        self.handlers.remove(pattern, |entry| entry.id == id);
    }

    /// Check whether any subscriber would receive an event on this topic.
    pub fn has_subscribers(&self, topic: &str) -> bool {
        !self.handlers.match_topic(topic).is_empty()
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new()
    }
}
