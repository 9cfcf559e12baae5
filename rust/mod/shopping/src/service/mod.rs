pub mod catalog;
pub mod items;
pub mod lists;
pub mod stats;

use std::sync::Arc;

use grocer_core::ServiceError;
use grocer_flux::EventFeed;
use grocer_sql::{Row, SQLStore};

use crate::events::Change;
use crate::model::{Category, Item, List, Unit};
use crate::schema;

/// Shopping service — holds the storage backend and the change feed, and
/// provides all business logic. Constructed once by the entry point and
/// shared as `Arc<ShoppingService>`.
pub struct ShoppingService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) feed: Arc<EventFeed>,
}

impl ShoppingService {
    /// Create the service and initialise the schema.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        feed: Arc<EventFeed>,
    ) -> Result<Arc<Self>, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, feed }))
    }

    /// The change feed this service publishes row-level events to.
    pub fn feed(&self) -> &Arc<EventFeed> {
        &self.feed
    }

    /// Publish a row-level change after a successful mutation.
    pub(crate) fn publish(&self, change: Change) {
        self.feed.publish(&change.topic(), change);
    }
}

// ── Row converters ──────────────────────────────────────────────────

pub(crate) fn row_to_list(row: &Row) -> Result<List, ServiceError> {
    Ok(List {
        id: require_i64(row, "id")?,
        name: require_str(row, "name")?,
        created_at: require_str(row, "created_at")?,
    })
}

pub(crate) fn row_to_category(row: &Row) -> Result<Category, ServiceError> {
    Ok(Category {
        id: require_i64(row, "id")?,
        name: require_str(row, "name")?,
        icon_name: row.get_str("icon_name").map(str::to_string),
    })
}

pub(crate) fn row_to_unit(row: &Row) -> Result<Unit, ServiceError> {
    Ok(Unit {
        id: require_i64(row, "id")?,
        name: require_str(row, "name")?,
    })
}

pub(crate) fn row_to_item(row: &Row) -> Result<Item, ServiceError> {
    Ok(Item {
        id: require_i64(row, "id")?,
        name: require_str(row, "name")?,
        quantity: require_i64(row, "quantity")?,
        brand: row.get_str("brand").map(str::to_string),
        comments: row.get_str("comments").map(str::to_string),
        bought: require_i64(row, "bought")? != 0,
        added_at: require_str(row, "added_at")?,
        list_id: require_i64(row, "list_id")?,
        category_id: require_i64(row, "category_id")?,
        unit_id: require_i64(row, "unit_id")?,
    })
}

fn require_i64(row: &Row, column: &str) -> Result<i64, ServiceError> {
    row.get_i64(column)
        .ok_or_else(|| ServiceError::Internal(format!("missing column {column}")))
}

fn require_str(row: &Row, column: &str) -> Result<String, ServiceError> {
    row.get_str(column)
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Internal(format!("missing column {column}")))
}
