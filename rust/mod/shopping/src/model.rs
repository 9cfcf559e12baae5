use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Core rows — map 1:1 to SQL columns, no JSON blob
// ---------------------------------------------------------------------------

/// A shopping list. Owns zero or more items; deleting a list deletes its
/// items first (explicit cascade in the service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// A classification tag for items (e.g. produce, dairy). Seeded at first
/// start; not owned by any list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

/// A measurement unit for an item's quantity (e.g. kg, piece).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    pub name: String,
}

/// A purchasable entry. Always references exactly one list, one category
/// and one unit at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub bought: bool,
    pub added_at: String,
    pub list_id: i64,
    pub category_id: i64,
    pub unit_id: i64,
}

// ---------------------------------------------------------------------------
// Statistics — derived, never stored
// ---------------------------------------------------------------------------

/// One row of a category breakdown: how many items of a list fall into
/// this category, and which share of the list that is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category_id: i64,
    /// Resolved category name; the literal "Unknown" when the id no
    /// longer resolves to a category.
    pub category: String,
    pub count: i64,
    pub percent: f64,
}

/// Per-list statistics.
///
/// `total_quantity` is the COUNT OF ITEM ROWS, not the sum of the items'
/// `quantity` fields — the percentages are computed against this count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStats {
    pub list_id: i64,
    pub name: String,
    pub total_quantity: i64,
    pub categories: Vec<CategoryCount>,
}
