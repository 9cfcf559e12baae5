//! Path layout and merge rules for the client-side collections.
//!
//! Rows live in a [`StateStore`] under:
//! - `lists/{list_id}` — the list row
//! - `lists/{list_id}/categories/{category_id}/items/{item_id}` — item rows,
//!   grouped the way the screens render them
//! - `categories/{category_id}` — catalog rows

use grocer_flux::StateStore;

use crate::events::{Change, ChangeKind};
use crate::model::{Item, List};

pub fn list_path(list_id: i64) -> String {
    format!("lists/{list_id}")
}

pub fn item_path(item: &Item) -> String {
    format!(
        "lists/{}/categories/{}/items/{}",
        item.list_id, item.category_id, item.id
    )
}

pub fn category_path(category_id: i64) -> String {
    format!("categories/{category_id}")
}

/// Merge one row-level change into the collections.
///
/// - Insert: place the row into its grouping.
/// - Update: replace the row by id (moving groupings when its keys changed).
/// - Delete: remove the row by id from any grouping it appears in.
pub fn apply_change(store: &StateStore, change: &Change) {
    match change {
        Change::List { kind, row } => match kind {
            ChangeKind::Insert | ChangeKind::Update => {
                store.set(&list_path(row.id), row.clone());
            }
            ChangeKind::Delete => {
                store.remove_tree(&list_path(row.id));
            }
        },
        Change::Item { kind, row } => match kind {
            ChangeKind::Insert => {
                store.set(&item_path(row), row.clone());
            }
            ChangeKind::Update => {
                // The grouping keys may have changed; clear any old spot
                // before writing the new one.
                remove_item_everywhere(store, row.id);
                store.set(&item_path(row), row.clone());
            }
            ChangeKind::Delete => {
                remove_item_everywhere(store, row.id);
            }
        },
        Change::Category { kind, row } => match kind {
            ChangeKind::Insert | ChangeKind::Update => {
                store.set(&category_path(row.id), row.clone());
            }
            ChangeKind::Delete => {
                store.remove(&category_path(row.id));
            }
        },
    }
}

/// Find an item row anywhere in the collections by id.
pub fn find_item(store: &StateStore, item_id: i64) -> Option<Item> {
    let suffix = format!("/items/{item_id}");
    for path in store.paths() {
        if path.ends_with(&suffix) {
            if let Some(item) = store
                .get(&path)
                .and_then(|v| v.downcast_ref::<Item>().cloned())
            {
                return Some(item);
            }
        }
    }
    None
}

/// Remove an item row by id from every grouping it appears in.
pub fn remove_item_everywhere(store: &StateStore, item_id: i64) {
    let suffix = format!("/items/{item_id}");
    for path in store.paths() {
        if path.ends_with(&suffix) {
            store.remove(&path);
        }
    }
}

/// All list rows, ordered by id.
pub fn lists(store: &StateStore) -> Vec<List> {
    let mut lists: Vec<List> = store
        .scan("lists")
        .into_iter()
        .filter(|(path, _)| path.matches('/').count() == 1)
        .filter_map(|(_, value)| value.downcast_ref::<List>().cloned())
        .collect();
    lists.sort_by_key(|l| l.id);
    lists
}

/// Items of one grouping, sorted by name ascending — the display order.
pub fn items_in(store: &StateStore, list_id: i64, category_id: i64) -> Vec<Item> {
    let prefix = format!("lists/{list_id}/categories/{category_id}/items");
    let mut items: Vec<Item> = store
        .scan(&prefix)
        .into_iter()
        .filter_map(|(_, value)| value.downcast_ref::<Item>().cloned())
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    items
}
