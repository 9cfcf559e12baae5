use grocer_core::ServiceError;
use grocer_sql::SQLStore;

/// SQL schema for the shopping tables.
///
/// Deleting a list does NOT rely on a foreign-key cascade — the service
/// deletes the list's items explicitly before the list itself.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS lists (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_lists_created_at ON lists(created_at);

CREATE TABLE IF NOT EXISTS categories (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    icon_name  TEXT
);

CREATE TABLE IF NOT EXISTS units (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS items (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    quantity     INTEGER NOT NULL,
    brand        TEXT,
    comments     TEXT,
    bought       INTEGER NOT NULL DEFAULT 0,
    added_at     TEXT NOT NULL,
    list_id      INTEGER NOT NULL,
    category_id  INTEGER NOT NULL,
    unit_id      INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_items_list ON items(list_id);
CREATE INDEX IF NOT EXISTS idx_items_list_category ON items(list_id, category_id);
";

/// Initialise the schema. Idempotent.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sql.exec(statement, &[])
            .map_err(|e| ServiceError::Storage(format!("shopping schema init: {e}")))?;
    }
    Ok(())
}
