//! Flux — client-side state engine.
//!
//! A path-based state store with pub/sub, plus a synchronous event feed.
//! Rust owns the client state and merge logic; the rendering layer only
//! reads snapshots and reacts to change notifications.
//!
//! # Primitives
//!
//! - `StateStore::get(path)` — read state at a path, Arc zero-copy
//! - `StateStore::set(path, value)` — write state, notify subscribers
//! - `EventFeed::publish(topic, event)` — deliver an event to subscribers,
//!   without storing it (events are a stream, not state)
//! - `subscribe(pattern)` — observe, Trie-matched
//!
//! # Path Addressing
//!
//! State and events live in a flat path namespace with `/` as separator:
//! - Collections: `lists/3`, `lists/3/categories/7/items/41`
//! - Derived state: `stats/3`
//! - Events: `changes/items/41`
//!
//! # Trie Pattern Matching
//!
//! Subscriptions use MQTT-style wildcards:
//! - Exact: `lists/3`
//! - Single-level: `changes/+` matches `changes/lists`, `changes/items`
//! - Multi-level: `changes/#` matches everything under `changes/`

pub mod feed;
pub mod store;
pub mod trie;
pub mod value;

pub use feed::EventFeed;
pub use store::StateStore;
pub use trie::Trie;
pub use value::{StateValue, SubscriptionId};
