//! Client-side state: collections kept in sync from the change feed.
//!
//! A [`SyncSession`] owns the subscription for one consuming view. The
//! view starts the session when it appears, reads snapshots from the
//! session's store, and the session stops (explicitly or on drop) when
//! the view goes away.

pub mod collections;
pub mod error;
pub mod stats;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use grocer_flux::{EventFeed, StateStore, SubscriptionId};

use crate::events::{Change, ChangeKind, TOPIC_ALL};
use crate::model::{Item, List, ListStats};
use stats::{stats_path, StatsOutcome};

pub use error::{ClientError, ErrorKind};

/// State path where the most recent client-side failure is surfaced for
/// the notification layer.
pub const NOTICE_PATH: &str = "notices/error";

/// Client-side configuration: where the API and the change feed live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API.
    pub api_base_url: String,
    /// Endpoint of the change-feed service.
    pub feed_url: String,
    /// Credential presented to the change-feed service.
    #[serde(default)]
    pub feed_key: String,
}

/// Source of full per-list statistics, used for the initial load and for
/// the reload fallback.
pub type StatsSource =
    Arc<dyn Fn(i64) -> Result<ListStats, ClientError> + Send + Sync>;

/// A managed subscription: merges row-level change events into a local
/// [`StateStore`] for the lifetime of the consuming view.
pub struct SyncSession {
    store: Arc<StateStore>,
    feed: Arc<EventFeed>,
    stats_source: StatsSource,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl SyncSession {
    pub fn new(feed: Arc<EventFeed>, stats_source: StatsSource) -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            feed,
            stats_source,
            subscription: Mutex::new(None),
        }
    }

    /// The local state store. Snapshots only — mutation happens through
    /// change events.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Start consuming change events. Idempotent.
    pub fn start(&self) {
        let mut subscription = self.subscription.lock().unwrap();
        if subscription.is_some() {
            return;
        }

        let store = Arc::clone(&self.store);
        let stats_source = Arc::clone(&self.stats_source);
        let id = self.feed.subscribe(TOPIC_ALL, move |_topic, event| {
            if let Some(change) = event.downcast_ref::<Change>() {
                handle_change(&store, &stats_source, change);
            }
        });
        *subscription = Some(id);
    }

    /// Stop consuming change events. Idempotent; also runs on drop.
    pub fn stop(&self) {
        if let Some(id) = self.subscription.lock().unwrap().take() {
            self.feed.unsubscribe(TOPIC_ALL, id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.lock().unwrap().is_some()
    }

    /// Load a list's statistics from the source and start tracking them
    /// incrementally.
    pub fn track_stats(&self, list_id: i64) -> Result<(), ClientError> {
        let stats = (self.stats_source)(list_id)?;
        self.store.set(&stats_path(list_id), stats);
        Ok(())
    }

    // ── Snapshots ───────────────────────────────────────────────────

    pub fn lists(&self) -> Vec<List> {
        collections::lists(&self.store)
    }

    pub fn items_in(&self, list_id: i64, category_id: i64) -> Vec<Item> {
        collections::items_in(&self.store, list_id, category_id)
    }

    pub fn stats(&self, list_id: i64) -> Option<ListStats> {
        self.store
            .get(&stats_path(list_id))
            .and_then(|v| v.downcast_ref::<ListStats>().cloned())
    }

    pub fn last_error(&self) -> Option<ClientError> {
        self.store
            .get(NOTICE_PATH)
            .and_then(|v| v.downcast_ref::<ClientError>().cloned())
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Merge one change event: collections first, then the statistics of any
/// affected, tracked list.
fn handle_change(store: &StateStore, stats_source: &StatsSource, change: &Change) {
    match change {
        Change::Item { kind, row } => {
            let previous = collections::find_item(store, row.id);
            collections::apply_change(store, change);

            match (*kind, previous) {
                // A move between lists is a delete in the old list's
                // breakdown and an insert in the new one's.
                (ChangeKind::Update, Some(previous)) if previous.list_id != row.list_id => {
                    apply_stats(store, stats_source, previous.list_id, ChangeKind::Delete, &previous, None);
                    apply_stats(store, stats_source, row.list_id, ChangeKind::Insert, row, None);
                }
                (kind, previous) => {
                    apply_stats(store, stats_source, row.list_id, kind, row, previous.as_ref());
                }
            }
        }
        Change::List { kind, row } => {
            collections::apply_change(store, change);
            if *kind == ChangeKind::Delete {
                store.remove(&stats_path(row.id));
            }
        }
        Change::Category { .. } => {
            collections::apply_change(store, change);
        }
    }
}

/// Apply an item event to a tracked breakdown; untracked lists are
/// ignored, and events that cannot be applied locally trigger a full
/// reload from the source.
fn apply_stats(
    store: &StateStore,
    stats_source: &StatsSource,
    list_id: i64,
    kind: ChangeKind,
    row: &Item,
    previous: Option<&Item>,
) {
    let path = stats_path(list_id);
    let Some(mut tracked) = store
        .get(&path)
        .and_then(|v| v.downcast_ref::<ListStats>().cloned())
    else {
        return;
    };

    match stats::apply_item_change(&mut tracked, kind, row, previous) {
        StatsOutcome::Applied => store.set(&path, tracked),
        StatsOutcome::ReloadRequired => match stats_source(list_id) {
            Ok(fresh) => store.set(&path, fresh),
            Err(err) => store.set(NOTICE_PATH, err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::items::AddItemInput;
    use crate::service::test_support::{seed_one_of_each, test_service};
    use crate::service::ShoppingService;

    fn session_for(svc: &Arc<ShoppingService>) -> SyncSession {
        let source_svc = Arc::clone(svc);
        let session = SyncSession::new(
            Arc::clone(svc.feed()),
            Arc::new(move |list_id| {
                source_svc
                    .list_stats(list_id)
                    .map_err(|e| ClientError::from_status(e.status_code().as_u16(), e.to_string()))
            }),
        );
        session.start();
        session
    }

    fn input(name: &str, quantity: i64, unit_id: i64) -> AddItemInput {
        AddItemInput {
            name: Some(name.to_string()),
            quantity: Some(quantity),
            brand: None,
            comments: None,
            unit_id: Some(unit_id),
        }
    }

    #[test]
    fn session_mirrors_service_mutations() {
        let svc = test_service();
        let (category_id, unit_id) = seed_one_of_each(&svc);
        let session = session_for(&svc);

        let list = svc.create_list("Groceries").unwrap();
        let item = svc
            .add_item(list.id, category_id, input("Milk", 2, unit_id))
            .unwrap();

        assert_eq!(session.lists(), vec![list.clone()]);
        assert_eq!(session.items_in(list.id, category_id), vec![item.clone()]);

        svc.set_bought(item.id, true).unwrap();
        assert!(session.items_in(list.id, category_id)[0].bought);

        svc.delete_item(item.id).unwrap();
        assert!(session.items_in(list.id, category_id).is_empty());
    }

    #[test]
    fn list_delete_clears_collections_and_stats() {
        let svc = test_service();
        let (category_id, unit_id) = seed_one_of_each(&svc);
        let session = session_for(&svc);

        let list = svc.create_list("Groceries").unwrap();
        svc.add_item(list.id, category_id, input("Milk", 1, unit_id))
            .unwrap();
        session.track_stats(list.id).unwrap();
        assert!(session.stats(list.id).is_some());

        svc.delete_list(list.id).unwrap();

        assert!(session.lists().is_empty());
        assert!(session.items_in(list.id, category_id).is_empty());
        assert!(session.stats(list.id).is_none());
    }

    #[test]
    fn tracked_stats_follow_item_events_incrementally() {
        let svc = test_service();
        let (category_id, unit_id) = seed_one_of_each(&svc);
        let session = session_for(&svc);

        let list = svc.create_list("Groceries").unwrap();
        svc.add_item(list.id, category_id, input("Milk", 1, unit_id))
            .unwrap();
        session.track_stats(list.id).unwrap();

        // Insert into the already-tracked category: applied locally.
        svc.add_item(list.id, category_id, input("Eggs", 1, unit_id))
            .unwrap();
        let stats = session.stats(list.id).unwrap();
        assert_eq!(stats.total_quantity, 2);
        assert_eq!(stats.categories.len(), 1);
        assert_eq!(stats.categories[0].count, 2);
        assert_eq!(stats.categories[0].percent, 100.0);
    }

    #[test]
    fn event_for_untracked_category_reloads_stats() {
        let svc = test_service();
        let (category_id, unit_id) = seed_one_of_each(&svc);
        let produce = svc.create_category("Produce", None).unwrap();
        let session = session_for(&svc);

        let list = svc.create_list("Groceries").unwrap();
        svc.add_item(list.id, category_id, input("Milk", 1, unit_id))
            .unwrap();
        session.track_stats(list.id).unwrap();

        // Produce is not in the tracked breakdown — the session must fall
        // back to a full reload, which resolves the category name.
        svc.add_item(list.id, produce.id, input("Apples", 1, unit_id))
            .unwrap();

        let stats = session.stats(list.id).unwrap();
        assert_eq!(stats.total_quantity, 2);
        assert_eq!(stats.categories.len(), 2);
        assert!(stats
            .categories
            .iter()
            .any(|c| c.category == "Produce" && c.count == 1 && c.percent == 50.0));
    }

    #[test]
    fn untracked_lists_accumulate_no_stats() {
        let svc = test_service();
        let (category_id, unit_id) = seed_one_of_each(&svc);
        let session = session_for(&svc);

        let list = svc.create_list("Groceries").unwrap();
        svc.add_item(list.id, category_id, input("Milk", 1, unit_id))
            .unwrap();

        assert!(session.stats(list.id).is_none());
    }

    #[test]
    fn stop_detaches_from_the_feed() {
        let svc = test_service();
        let session = session_for(&svc);
        assert!(session.is_running());

        session.stop();
        assert!(!session.is_running());

        svc.create_list("Groceries").unwrap();
        assert!(session.lists().is_empty());
    }

    #[test]
    fn drop_unsubscribes() {
        let svc = test_service();
        {
            let session = session_for(&svc);
            assert!(session.is_running());
        }
        // The feed no longer has a matching subscriber.
        assert!(!svc.feed().has_subscribers("changes/lists/1"));
    }
}
