use grocer_core::{merge_patch, now_rfc3339, ServiceError};
use grocer_sql::Value;

use crate::events::{Change, ChangeKind};
use crate::model::Item;
use crate::validate::{self, ItemFields};
use super::{row_to_item, ShoppingService};

/// Fields accepted when adding an item, as extracted from the payload.
#[derive(Debug, Default)]
pub struct AddItemInput {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub brand: Option<String>,
    pub comments: Option<String>,
    pub unit_id: Option<i64>,
}

/// Patch fields recognized by `update_item`. Anything else in the payload
/// is ignored; a patch containing none of these is rejected.
const RECOGNIZED_FIELDS: &[&str] = &[
    "name",
    "quantity",
    "brand",
    "comments",
    "bought",
    "categoryId",
    "unitId",
];

impl ShoppingService {
    /// Add an item to a list under a category.
    ///
    /// Field rules are enforced by `validate::validate_item`; the
    /// referenced list, category and unit must exist.
    pub fn add_item(
        &self,
        list_id: i64,
        category_id: i64,
        input: AddItemInput,
    ) -> Result<Item, ServiceError> {
        let errors = validate::validate_item(&ItemFields {
            name: input.name.as_deref(),
            quantity: input.quantity,
            brand: input.brand.as_deref(),
            comments: input.comments.as_deref(),
        });
        if !errors.is_empty() {
            return Err(ServiceError::Validation(validate::to_message(&errors)));
        }
        let unit_id = input
            .unit_id
            .ok_or_else(|| ServiceError::Validation("unitId is required".to_string()))?;

        self.get_list(list_id)?;
        self.get_category(category_id)?;
        self.get_unit(unit_id)?;

        let added_at = now_rfc3339();
        let id = self
            .sql
            .exec_insert(
                "INSERT INTO items (name, quantity, brand, comments, bought, added_at, \
                 list_id, category_id, unit_id) \
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, ?8)",
                &[
                    Value::Text(input.name.clone().unwrap_or_default()),
                    Value::Integer(input.quantity.unwrap_or_default()),
                    opt_text(input.brand.as_deref()),
                    opt_text(input.comments.as_deref()),
                    Value::Text(added_at.clone()),
                    Value::Integer(list_id),
                    Value::Integer(category_id),
                    Value::Integer(unit_id),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let item = Item {
            id,
            name: input.name.unwrap_or_default(),
            quantity: input.quantity.unwrap_or_default(),
            brand: input.brand,
            comments: input.comments,
            bought: false,
            added_at,
            list_id,
            category_id,
            unit_id,
        };
        self.publish(Change::Item {
            kind: ChangeKind::Insert,
            row: item.clone(),
        });
        Ok(item)
    }

    /// Get an item by id.
    pub fn get_item(&self, id: i64) -> Result<Item, ServiceError> {
        let rows = self
            .sql
            .query("SELECT * FROM items WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("item {id} not found")))?;
        row_to_item(row)
    }

    /// Items of a list under a category, sorted by name ascending.
    pub fn items_by_list_and_category(
        &self,
        list_id: i64,
        category_id: i64,
    ) -> Result<Vec<Item>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT * FROM items WHERE list_id = ?1 AND category_id = ?2 \
                 ORDER BY name ASC, id ASC",
                &[Value::Integer(list_id), Value::Integer(category_id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_item).collect()
    }

    /// Update an item with a partial patch (JSON merge semantics over the
    /// recognized fields). A patch with zero recognized fields is rejected
    /// rather than treated as a no-op. The merged result is re-validated.
    pub fn update_item(
        &self,
        id: i64,
        patch: serde_json::Value,
    ) -> Result<Item, ServiceError> {
        let current = self.get_item(id)?;

        let patch_obj = patch
            .as_object()
            .ok_or_else(|| ServiceError::Validation("patch must be a JSON object".to_string()))?;
        let mut recognized = serde_json::Map::new();
        for key in RECOGNIZED_FIELDS {
            if let Some(value) = patch_obj.get(*key) {
                recognized.insert((*key).to_string(), value.clone());
            }
        }
        if recognized.is_empty() {
            return Err(ServiceError::Validation(
                "patch contains no recognized fields".to_string(),
            ));
        }

        let mut base = serde_json::to_value(&current)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        merge_patch(&mut base, &serde_json::Value::Object(recognized));
        // Identity and provenance are not patchable.
        base["id"] = serde_json::json!(current.id);
        base["listId"] = serde_json::json!(current.list_id);
        base["addedAt"] = serde_json::json!(current.added_at);

        let updated: Item = serde_json::from_value(base)
            .map_err(|e| ServiceError::Validation(format!("invalid patch: {e}")))?;

        let errors = validate::validate_item(&ItemFields {
            name: Some(&updated.name),
            quantity: Some(updated.quantity),
            brand: updated.brand.as_deref(),
            comments: updated.comments.as_deref(),
        });
        if !errors.is_empty() {
            return Err(ServiceError::Validation(validate::to_message(&errors)));
        }
        if updated.category_id != current.category_id {
            self.get_category(updated.category_id)?;
        }
        if updated.unit_id != current.unit_id {
            self.get_unit(updated.unit_id)?;
        }

        self.sql
            .exec(
                "UPDATE items SET name = ?1, quantity = ?2, brand = ?3, comments = ?4, \
                 bought = ?5, category_id = ?6, unit_id = ?7 WHERE id = ?8",
                &[
                    Value::Text(updated.name.clone()),
                    Value::Integer(updated.quantity),
                    opt_text(updated.brand.as_deref()),
                    opt_text(updated.comments.as_deref()),
                    Value::Integer(i64::from(updated.bought)),
                    Value::Integer(updated.category_id),
                    Value::Integer(updated.unit_id),
                    Value::Integer(id),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        self.publish(Change::Item {
            kind: ChangeKind::Update,
            row: updated.clone(),
        });
        Ok(updated)
    }

    /// Set the bought flag — the one-field fast path used by the checkbox.
    pub fn set_bought(&self, id: i64, bought: bool) -> Result<Item, ServiceError> {
        let mut item = self.get_item(id)?;

        self.sql
            .exec(
                "UPDATE items SET bought = ?1 WHERE id = ?2",
                &[Value::Integer(i64::from(bought)), Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        item.bought = bought;
        self.publish(Change::Item {
            kind: ChangeKind::Update,
            row: item.clone(),
        });
        Ok(item)
    }

    /// Delete an item by id.
    pub fn delete_item(&self, id: i64) -> Result<(), ServiceError> {
        let item = self.get_item(id)?;

        self.sql
            .exec("DELETE FROM items WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        self.publish(Change::Item {
            kind: ChangeKind::Delete,
            row: item,
        });
        Ok(())
    }
}

fn opt_text(value: Option<&str>) -> Value {
    match value {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}
