pub mod categories;
pub mod items;
pub mod lists;
pub mod stats;
pub mod units;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;

use grocer_core::ServiceError;

use crate::service::ShoppingService;

/// Shared application state.
pub type AppState = Arc<ShoppingService>;

/// Build the shopping API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(lists::routes())
        .merge(items::routes())
        .merge(categories::routes())
        .merge(units::routes())
        .merge(stats::routes())
        .with_state(state)
}

/// Standard API error response body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": self.message,
        }));
        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError {
            code: err.status_code().as_u16(),
            message: err.to_string(),
        }
    }
}

/// Wrap a service result into a 200 JSON response.
pub(crate) fn ok_json<T: Serialize>(
    result: Result<T, ServiceError>,
) -> Result<Json<T>, ApiError> {
    result.map(Json).map_err(ApiError::from)
}

/// Wrap a service result into a 201 JSON response.
pub(crate) fn created_json<T: Serialize>(
    result: Result<T, ServiceError>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    result
        .map(|value| (StatusCode::CREATED, Json(value)))
        .map_err(ApiError::from)
}

/// Wrap a service result into a 204 response.
pub(crate) fn no_content(result: Result<(), ServiceError>) -> Result<StatusCode, ApiError> {
    result
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(ApiError::from)
}

/// Parse a numeric route identifier. Non-numeric ids are rejected with a
/// validation error before any storage access.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        ApiError::from(ServiceError::Validation(format!(
            "{what} must be an integer, got '{raw}'"
        )))
    })
}

// ── Payload field extraction ────────────────────────────────────────
//
// Mutation bodies arrive as raw JSON so malformed fields map to this
// API's own validation errors instead of the framework's rejection shape.

pub(crate) fn body_str(body: &serde_json::Value, key: &str) -> Option<String> {
    body.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

pub(crate) fn body_i64(body: &serde_json::Value, key: &str) -> Option<i64> {
    body.get(key).and_then(|v| v.as_i64())
}

pub(crate) fn body_bool(body: &serde_json::Value, key: &str) -> Option<bool> {
    body.get(key).and_then(|v| v.as_bool())
}
