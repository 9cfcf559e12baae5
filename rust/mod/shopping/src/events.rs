//! Row-level change events published by the service after each successful
//! mutation and consumed by the client sync layer.

use crate::model::{Category, Item, List};

/// What happened to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row-level change. Delete events carry the full row as it was before
/// deletion, so consumers can locate it in their groupings.
#[derive(Debug, Clone)]
pub enum Change {
    List { kind: ChangeKind, row: List },
    Item { kind: ChangeKind, row: Item },
    Category { kind: ChangeKind, row: Category },
}

/// Pattern matching every change event.
pub const TOPIC_ALL: &str = "changes/#";

impl Change {
    /// Feed topic this change is published on, e.g. `changes/items/41`.
    pub fn topic(&self) -> String {
        match self {
            Change::List { row, .. } => format!("changes/lists/{}", row.id),
            Change::Item { row, .. } => format!("changes/items/{}", row.id),
            Change::Category { row, .. } => format!("changes/categories/{}", row.id),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::List { kind, .. }
            | Change::Item { kind, .. }
            | Change::Category { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_carry_table_and_id() {
        let change = Change::Item {
            kind: ChangeKind::Insert,
            row: Item {
                id: 41,
                name: "Milk".into(),
                quantity: 1,
                brand: None,
                comments: None,
                bought: false,
                added_at: "2024-05-01T10:00:00+00:00".into(),
                list_id: 3,
                category_id: 7,
                unit_id: 1,
            },
        };
        assert_eq!(change.topic(), "changes/items/41");
        assert_eq!(change.kind(), ChangeKind::Insert);
    }
}
