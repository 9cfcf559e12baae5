use grocer_core::{now_rfc3339, ServiceError};
use grocer_sql::Value;

use crate::events::{Change, ChangeKind};
use crate::model::List;
use super::{row_to_item, row_to_list, ShoppingService};

impl ShoppingService {
    /// Create a new list. The name is required at this layer; length
    /// constraints are the caller's concern (see `validate::validate_list`).
    pub fn create_list(&self, name: &str) -> Result<List, ServiceError> {
        let created_at = now_rfc3339();
        let id = self
            .sql
            .exec_insert(
                "INSERT INTO lists (name, created_at) VALUES (?1, ?2)",
                &[Value::Text(name.to_string()), Value::Text(created_at.clone())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let list = List {
            id,
            name: name.to_string(),
            created_at,
        };
        self.publish(Change::List {
            kind: ChangeKind::Insert,
            row: list.clone(),
        });
        Ok(list)
    }

    /// Get a list by id.
    pub fn get_list(&self, id: i64) -> Result<List, ServiceError> {
        let rows = self
            .sql
            .query("SELECT * FROM lists WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("list {id} not found")))?;
        row_to_list(row)
    }

    /// All lists, oldest first.
    pub fn list_lists(&self) -> Result<Vec<List>, ServiceError> {
        let rows = self
            .sql
            .query("SELECT * FROM lists ORDER BY created_at ASC, id ASC", &[])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_list).collect()
    }

    /// Rename a list.
    pub fn rename_list(&self, id: i64, name: &str) -> Result<List, ServiceError> {
        let affected = self
            .sql
            .exec(
                "UPDATE lists SET name = ?1 WHERE id = ?2",
                &[Value::Text(name.to_string()), Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("list {id} not found")));
        }

        let list = self.get_list(id)?;
        self.publish(Change::List {
            kind: ChangeKind::Update,
            row: list.clone(),
        });
        Ok(list)
    }

    /// Delete a list and its items.
    ///
    /// Explicit two-step cascade: the items are deleted first, then the
    /// list row. One item-delete event is published per removed item.
    pub fn delete_list(&self, id: i64) -> Result<(), ServiceError> {
        let list = self.get_list(id)?;

        let item_rows = self
            .sql
            .query(
                "SELECT * FROM items WHERE list_id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let items = item_rows
            .iter()
            .map(row_to_item)
            .collect::<Result<Vec<_>, _>>()?;

        self.sql
            .exec("DELETE FROM items WHERE list_id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        self.sql
            .exec("DELETE FROM lists WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        for item in items {
            self.publish(Change::Item {
                kind: ChangeKind::Delete,
                row: item,
            });
        }
        self.publish(Change::List {
            kind: ChangeKind::Delete,
            row: list,
        });
        Ok(())
    }
}
