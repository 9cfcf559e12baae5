//! Incremental client-side statistics.
//!
//! Item-level change events adjust the locally-held breakdown in place.
//! When an event references a category the local breakdown does not track
//! (no row yet — the category name is unknown here), the caller must fall
//! back to a full reload of that list's statistics instead of guessing
//! the delta.

use crate::events::ChangeKind;
use crate::model::{Item, ListStats};
use crate::service::stats::round2;

/// State path holding a list's statistics.
pub fn stats_path(list_id: i64) -> String {
    format!("stats/{list_id}")
}

/// Result of applying an item event to a local breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOutcome {
    /// The breakdown was adjusted in place.
    Applied,
    /// The event could not be applied locally — reload this list's
    /// statistics from the source.
    ReloadRequired,
}

/// Apply one item-level change to a list's breakdown.
///
/// `previous` is the row as the client knew it before the change; it is
/// required for updates (to detect category moves) and may be absent when
/// the client never saw the row — which forces a reload.
pub fn apply_item_change(
    stats: &mut ListStats,
    kind: ChangeKind,
    row: &Item,
    previous: Option<&Item>,
) -> StatsOutcome {
    let outcome = match kind {
        ChangeKind::Insert => increment(stats, row.category_id),
        ChangeKind::Delete => decrement(stats, row.category_id),
        ChangeKind::Update => {
            let Some(previous) = previous else {
                return StatsOutcome::ReloadRequired;
            };
            if previous.category_id == row.category_id {
                // Nothing that feeds the breakdown changed.
                return StatsOutcome::Applied;
            }
            match decrement(stats, previous.category_id) {
                StatsOutcome::Applied => increment(stats, row.category_id),
                reload => reload,
            }
        }
    };

    if outcome == StatsOutcome::Applied {
        recompute_percentages(stats);
    }
    outcome
}

fn increment(stats: &mut ListStats, category_id: i64) -> StatsOutcome {
    let Some(entry) = stats
        .categories
        .iter_mut()
        .find(|c| c.category_id == category_id)
    else {
        // Untracked category — its name is unknown locally.
        return StatsOutcome::ReloadRequired;
    };
    entry.count += 1;
    stats.total_quantity += 1;
    StatsOutcome::Applied
}

fn decrement(stats: &mut ListStats, category_id: i64) -> StatsOutcome {
    let Some(index) = stats
        .categories
        .iter()
        .position(|c| c.category_id == category_id)
    else {
        return StatsOutcome::ReloadRequired;
    };
    stats.categories[index].count -= 1;
    if stats.categories[index].count <= 0 {
        stats.categories.remove(index);
    }
    stats.total_quantity -= 1;
    StatsOutcome::Applied
}

/// Recompute every row's share of the total and restore count-descending
/// order. Stable, so ties keep their current order.
pub fn recompute_percentages(stats: &mut ListStats) {
    let total = stats.total_quantity;
    if total <= 0 {
        stats.total_quantity = 0;
        stats.categories.clear();
        return;
    }
    for row in &mut stats.categories {
        row.percent = round2(row.count as f64 / total as f64 * 100.0);
    }
    stats.categories.sort_by(|a, b| b.count.cmp(&a.count));
}
