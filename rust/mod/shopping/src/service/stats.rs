//! Statistics — the derived per-list / per-month category breakdown.
//!
//! Everything here is recomputed from current rows on every request; there
//! is no cache and no staleness window.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use grocer_core::ServiceError;
use grocer_sql::Value;

use crate::model::{CategoryCount, Item, List, ListStats};
use super::{row_to_item, row_to_list, ShoppingService};

/// Label used when an item's category id no longer resolves.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Parse a `YYYY-MM` month into a half-open UTC interval
/// `[first-of-month, first-of-next-month)`.
///
/// The pattern is exact (four digits, a dash, two digits, month 01–12);
/// anything else is a validation error, including a missing leading zero.
pub fn parse_month(text: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return Err(ServiceError::Validation(format!(
            "month must match YYYY-MM, got '{text}'"
        )));
    }

    let year: i32 = text[..4].parse().unwrap_or_default();
    let month: u32 = text[5..].parse().unwrap_or_default();
    if !(1..=12).contains(&month) {
        return Err(ServiceError::Validation(format!(
            "month must match YYYY-MM, got '{text}'"
        )));
    }

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ServiceError::Internal(format!("invalid month start for '{text}'")))?;
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ServiceError::Internal(format!("invalid month end for '{text}'")))?;
    Ok((start, end))
}

/// Group items by category and compute count + share of total.
///
/// `total` is the number of item rows. Groups appear in first-seen order,
/// then get stably sorted by count descending — equal counts keep their
/// grouping order. Ids missing from `names` resolve to "Unknown".
pub fn category_breakdown(
    items: &[Item],
    names: &HashMap<i64, String>,
) -> Vec<CategoryCount> {
    let total = items.len() as i64;
    if total == 0 {
        return Vec::new();
    }

    let mut order: Vec<i64> = Vec::new();
    let mut counts: HashMap<i64, i64> = HashMap::new();
    for item in items {
        if !counts.contains_key(&item.category_id) {
            order.push(item.category_id);
        }
        *counts.entry(item.category_id).or_insert(0) += 1;
    }

    let mut rows: Vec<CategoryCount> = order
        .into_iter()
        .map(|category_id| {
            let count = counts[&category_id];
            CategoryCount {
                category_id,
                category: names
                    .get(&category_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                count,
                percent: round2(count as f64 / total as f64 * 100.0),
            }
        })
        .collect();

    // Stable: ties keep first-seen grouping order.
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ShoppingService {
    /// Lists whose creation timestamp falls in `[start, end)`, ascending
    /// by creation time.
    pub fn lists_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<List>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT * FROM lists WHERE created_at >= ?1 AND created_at < ?2 \
                 ORDER BY created_at ASC, id ASC",
                &[
                    Value::Text(start.to_rfc3339()),
                    Value::Text(end.to_rfc3339()),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_list).collect()
    }

    /// Breakdown for every list created in the given `YYYY-MM` month.
    /// Lists with zero items still appear, with an empty category array.
    pub fn monthly_stats(&self, month: &str) -> Result<Vec<ListStats>, ServiceError> {
        let (start, end) = parse_month(month)?;
        let lists = self.lists_in_range(start, end)?;
        let names = self.category_names()?;

        lists
            .into_iter()
            .map(|list| {
                let items = self.items_of_list(list.id)?;
                Ok(ListStats {
                    list_id: list.id,
                    name: list.name,
                    total_quantity: items.len() as i64,
                    categories: category_breakdown(&items, &names),
                })
            })
            .collect()
    }

    /// Breakdown for one list, ignoring month. 404 when the id does not
    /// exist.
    pub fn list_stats(&self, id: i64) -> Result<ListStats, ServiceError> {
        let list = self.get_list(id)?;
        let items = self.items_of_list(id)?;
        let names = self.category_names()?;

        Ok(ListStats {
            list_id: list.id,
            name: list.name,
            total_quantity: items.len() as i64,
            categories: category_breakdown(&items, &names),
        })
    }

    fn items_of_list(&self, list_id: i64) -> Result<Vec<Item>, ServiceError> {
        let rows = self
            .sql
            .query(
                "SELECT * FROM items WHERE list_id = ?1 ORDER BY id ASC",
                &[Value::Integer(list_id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.iter().map(row_to_item).collect()
    }

    fn category_names(&self) -> Result<HashMap<i64, String>, ServiceError> {
        Ok(self
            .list_categories()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_service;
    use super::*;
    use crate::service::items::AddItemInput;

    fn item_with_category(category_id: i64) -> Item {
        Item {
            id: 0,
            name: "x".into(),
            quantity: 1,
            brand: None,
            comments: None,
            bought: false,
            added_at: "2024-05-01T00:00:00+00:00".into(),
            list_id: 1,
            category_id,
            unit_id: 1,
        }
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

    // ── parse_month ─────────────────────────────────────────────────

    #[test]
    fn parse_month_interval_is_one_calendar_month() {
        for (text, days) in [("2024-01", 31), ("2024-02", 29), ("2023-02", 28), ("2024-04", 30)] {
            let (start, end) = parse_month(text).unwrap();
            assert_eq!((end - start).num_days(), days, "month {text}");
        }
    }

    #[test]
    fn parse_month_rolls_over_year_boundary() {
        let (start, end) = parse_month("2024-12").unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn parse_month_rejects_malformed_input() {
        for bad in [
            "2024/05", "2024-5", "24-05", "2024-13", "2024-00", "abcd-ef",
            "2024-05-01", "2024-05 ", " 2024-05", "", "May 2024",
        ] {
            assert!(
                matches!(parse_month(bad), Err(ServiceError::Validation(_))),
                "expected rejection for '{bad}'"
            );
        }
    }

    // ── category_breakdown ──────────────────────────────────────────

    #[test]
    fn breakdown_counts_and_percentages() {
        let names: HashMap<i64, String> =
            [(1, "Produce".to_string()), (2, "Dairy".to_string())].into();
        let items: Vec<Item> = [1, 1, 1, 2]
            .into_iter()
            .map(item_with_category)
            .collect();

        let rows = category_breakdown(&items, &names);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Produce");
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[0].percent, 75.0);
        assert_eq!(rows[1].category, "Dairy");
        assert_eq!(rows[1].count, 1);
        assert_eq!(rows[1].percent, 25.0);
    }

    #[test]
    fn breakdown_of_empty_set_is_empty() {
        let rows = category_breakdown(&[], &HashMap::new());
        assert!(rows.is_empty());
    }

    #[test]
    fn breakdown_percentages_sum_to_100_within_rounding() {
        // 7 categories with one item each: 14.29 * 7 = 100.03.
        let items: Vec<Item> = (1..=7).map(item_with_category).collect();
        let rows = category_breakdown(&items, &HashMap::new());

        let sum: f64 = rows.iter().map(|r| r.percent).sum();
        let tolerance = 0.02 * rows.len() as f64;
        assert!(
            (sum - 100.0).abs() <= tolerance,
            "sum {sum} outside tolerance {tolerance}"
        );
    }

    #[test]
    fn breakdown_ties_keep_first_seen_order() {
        let names: HashMap<i64, String> = [
            (5, "Frozen".to_string()),
            (2, "Dairy".to_string()),
            (9, "Bakery".to_string()),
        ]
        .into();
        let items: Vec<Item> = [5, 2, 9].into_iter().map(item_with_category).collect();

        let rows = category_breakdown(&items, &names);
        let order: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(order, vec!["Frozen", "Dairy", "Bakery"]);
    }

    #[test]
    fn breakdown_resolves_missing_category_to_unknown() {
        let names: HashMap<i64, String> = [(1, "Produce".to_string())].into();
        let items: Vec<Item> = [1, 42].into_iter().map(item_with_category).collect();

        let rows = category_breakdown(&items, &names);
        assert_eq!(rows[1].category, UNKNOWN_CATEGORY);
    }

    // ── service-level statistics ────────────────────────────────────

    /// Plant a list row with an explicit creation timestamp.
    fn plant_list(
        svc: &crate::service::ShoppingService,
        name: &str,
        created_at: &str,
    ) -> i64 {
        svc.sql
            .exec_insert(
                "INSERT INTO lists (name, created_at) VALUES (?1, ?2)",
                &[
                    Value::Text(name.to_string()),
                    Value::Text(created_at.to_string()),
                ],
            )
            .unwrap()
    }

    #[test]
    fn lists_in_range_is_half_open_and_ascending() {
        let svc = test_service();
        plant_list(&svc, "April", "2024-04-30T23:59:59+00:00");
        plant_list(&svc, "Late May", "2024-05-20T12:00:00+00:00");
        plant_list(&svc, "Early May", "2024-05-01T00:00:00+00:00");
        plant_list(&svc, "June", "2024-06-01T00:00:00+00:00");

        let (start, end) = parse_month("2024-05").unwrap();
        let lists = svc.lists_in_range(start, end).unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Early May", "Late May"]);
    }

    #[test]
    fn monthly_stats_counts_rows_not_quantities() {
        let svc = test_service();
        let produce = svc.create_category("Produce", None).unwrap();
        let dairy = svc.create_category("Dairy", None).unwrap();
        let unit = svc.create_unit("piece").unwrap();

        let list_id = plant_list(&svc, "Groceries", "2024-05-02T10:00:00+00:00");
        // Quantities deliberately larger than 1: total counts rows.
        for name in ["Apples", "Bananas", "Cherries"] {
            svc.add_item(list_id, produce.id, input(name, 5, unit.id))
                .unwrap();
        }
        svc.add_item(list_id, dairy.id, input("Milk", 3, unit.id))
            .unwrap();

        let stats = svc.monthly_stats("2024-05").unwrap();
        assert_eq!(stats.len(), 1);
        let list_stats = &stats[0];
        assert_eq!(list_stats.total_quantity, 4);
        assert_eq!(list_stats.categories.len(), 2);
        assert_eq!(list_stats.categories[0].category, "Produce");
        assert_eq!(list_stats.categories[0].count, 3);
        assert_eq!(list_stats.categories[0].percent, 75.0);
        assert_eq!(list_stats.categories[1].category, "Dairy");
        assert_eq!(list_stats.categories[1].count, 1);
        assert_eq!(list_stats.categories[1].percent, 25.0);
    }

    #[test]
    fn monthly_stats_includes_empty_lists() {
        let svc = test_service();
        plant_list(&svc, "Empty", "2024-05-02T10:00:00+00:00");

        let stats = svc.monthly_stats("2024-05").unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_quantity, 0);
        assert!(stats[0].categories.is_empty());
    }

    #[test]
    fn monthly_stats_rejects_bad_month() {
        let svc = test_service();
        assert!(matches!(
            svc.monthly_stats("05-2024"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn list_stats_ignores_month_and_404s_on_missing() {
        let svc = test_service();
        let produce = svc.create_category("Produce", None).unwrap();
        let unit = svc.create_unit("piece").unwrap();
        let list = svc.create_list("Groceries").unwrap();
        svc.add_item(list.id, produce.id, input("Apples", 1, unit.id))
            .unwrap();

        let stats = svc.list_stats(list.id).unwrap();
        assert_eq!(stats.list_id, list.id);
        assert_eq!(stats.total_quantity, 1);
        assert_eq!(stats.categories[0].percent, 100.0);

        assert!(matches!(
            svc.list_stats(999),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn deleted_category_shows_as_unknown_in_stats() {
        let svc = test_service();
        let produce = svc.create_category("Produce", None).unwrap();
        let unit = svc.create_unit("piece").unwrap();
        let list = svc.create_list("Groceries").unwrap();
        svc.add_item(list.id, produce.id, input("Apples", 1, unit.id))
            .unwrap();

        svc.delete_category(produce.id).unwrap();

        let stats = svc.list_stats(list.id).unwrap();
        assert_eq!(stats.categories[0].category, UNKNOWN_CATEGORY);
        assert_eq!(stats.categories[0].count, 1);
    }
}
