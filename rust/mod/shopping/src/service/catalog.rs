use grocer_core::ServiceError;
use grocer_sql::Value;

use crate::events::{Change, ChangeKind};
use crate::model::{Category, Unit};
use super::{row_to_category, row_to_unit, ShoppingService};

impl ShoppingService {
    // ── Categories ──────────────────────────────────────────────────

    /// All categories, by id.
    pub fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let rows = self
            .sql
            .query("SELECT * FROM categories ORDER BY id ASC", &[])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_category).collect()
    }

    /// Get a category by id.
    pub fn get_category(&self, id: i64) -> Result<Category, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT * FROM categories WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("category {id} not found")))?;
        row_to_category(row)
    }

    /// Create a category. Names are unique; a duplicate surfaces as a
    /// storage error.
    pub fn create_category(
        &self,
        name: &str,
        icon_name: Option<&str>,
    ) -> Result<Category, ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::Validation("name is required".to_string()));
        }

        let id = self
            .sql
            .exec_insert(
                "INSERT INTO categories (name, icon_name) VALUES (?1, ?2)",
                &[
                    Value::Text(name.to_string()),
                    match icon_name {
                        Some(icon) => Value::Text(icon.to_string()),
                        None => Value::Null,
                    },
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let category = Category {
            id,
            name: name.to_string(),
            icon_name: icon_name.map(str::to_string),
        };
        self.publish(Change::Category {
            kind: ChangeKind::Insert,
            row: category.clone(),
        });
        Ok(category)
    }

    /// Delete a category by id.
    ///
    /// Items referencing it are left in place; statistics resolve their
    /// category to the literal "Unknown" from then on.
    pub fn delete_category(&self, id: i64) -> Result<(), ServiceError> {
        let category = self.get_category(id)?;

        self.sql
            .exec(
                "DELETE FROM categories WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        self.publish(Change::Category {
            kind: ChangeKind::Delete,
            row: category,
        });
        Ok(())
    }

    // ── Units ───────────────────────────────────────────────────────

    /// All units, by id.
    pub fn list_units(&self) -> Result<Vec<Unit>, ServiceError> {
        let rows = self
            .sql
            .query("SELECT * FROM units ORDER BY id ASC", &[])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_unit).collect()
    }

    /// Get a unit by id.
    pub fn get_unit(&self, id: i64) -> Result<Unit, ServiceError> {
        let rows = self
            .sql
            .query("SELECT * FROM units WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound(format!("unit {id} not found")))?;
        row_to_unit(row)
    }

    /// Create a unit. Not exposed over HTTP — units come from seeding.
    pub fn create_unit(&self, name: &str) -> Result<Unit, ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::Validation("name is required".to_string()));
        }

        let id = self
            .sql
            .exec_insert(
                "INSERT INTO units (name) VALUES (?1)",
                &[Value::Text(name.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(Unit {
            id,
            name: name.to_string(),
        })
    }

    /// Seed the catalog tables. Runs only when both tables are empty, so
    /// a restart never duplicates or resurrects rows.
    pub fn seed_catalog(
        &self,
        categories: &[(&str, &str)],
        units: &[&str],
    ) -> Result<bool, ServiceError> {
        if !self.list_categories()?.is_empty() || !self.list_units()?.is_empty() {
            return Ok(false);
        }

        for (name, icon) in categories {
            self.create_category(name, Some(icon))?;
        }
        for name in units {
            self.create_unit(name)?;
        }
        Ok(true)
    }
}
