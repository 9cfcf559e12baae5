//! Field validators for list and item payloads.
//!
//! Pure functions: a candidate record goes in, an ordered map of
//! field-name → human-readable message comes out. An empty map means
//! valid. No side effects, no panics — the empty-vs-nonempty map is the
//! sole success/failure signal.

use std::collections::BTreeMap;

/// Ordered field-name → message map. Empty means valid.
pub type ValidationErrors = BTreeMap<&'static str, String>;

/// Join validation errors into a single `field: message` string for the
/// transport layer.
pub fn to_message(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a list name.
///
/// A missing or empty name is accepted here — the create handler
/// separately requires one, and the two layers intentionally disagree
/// (an empty name is defaulted elsewhere). When a name is present it
/// must be 3–50 characters.
pub fn validate_list(name: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Some(name) = name {
        let len = name.chars().count();
        if len > 0 && !(3..=50).contains(&len) {
            errors.insert("name", "must be between 3 and 50 characters".to_string());
        }
    }

    errors
}

/// Candidate fields of an item, as extracted from a request payload.
#[derive(Debug, Default)]
pub struct ItemFields<'a> {
    pub name: Option<&'a str>,
    pub quantity: Option<i64>,
    pub brand: Option<&'a str>,
    pub comments: Option<&'a str>,
}

/// Validate item fields: name required, ≤50; quantity ≥1; brand ≤50 and
/// comments ≤100 when present.
pub fn validate_item(fields: &ItemFields) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match fields.name {
        None => {
            errors.insert("name", "is required".to_string());
        }
        Some(name) if name.is_empty() => {
            errors.insert("name", "is required".to_string());
        }
        Some(name) if name.chars().count() > 50 => {
            errors.insert("name", "must be at most 50 characters".to_string());
        }
        Some(_) => {}
    }

    match fields.quantity {
        Some(q) if q >= 1 => {}
        _ => {
            errors.insert("quantity", "must be greater than 0".to_string());
        }
    }

    if let Some(brand) = fields.brand {
        if brand.chars().count() > 50 {
            errors.insert("brand", "must be at most 50 characters".to_string());
        }
    }

    if let Some(comments) = fields.comments {
        if comments.chars().count() > 100 {
            errors.insert("comments", "must be at most 100 characters".to_string());
        }
    }

    errors
}
