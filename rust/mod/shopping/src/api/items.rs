use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use grocer_core::ServiceError;

use crate::model::Item;
use crate::service::items::AddItemInput;
use super::{body_bool, body_i64, body_str, created_json, no_content, ok_json, parse_id, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/lists/{list_id}/categories/{category_id}/items",
            get(by_list_and_category).post(add),
        )
        .route(
            "/items/{id}",
            axum::routing::put(update).patch(toggle_bought).delete(remove),
        )
}

async fn add(
    State(svc): State<AppState>,
    Path((list_id, category_id)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let list_id = parse_id(&list_id, "listId")?;
    let category_id = parse_id(&category_id, "categoryId")?;

    let input = AddItemInput {
        name: body_str(&body, "name"),
        quantity: body_i64(&body, "quantity"),
        brand: body_str(&body, "brand"),
        comments: body_str(&body, "comments"),
        unit_id: body_i64(&body, "unitId"),
    };
    created_json(svc.add_item(list_id, category_id, input))
}

async fn by_list_and_category(
    State(svc): State<AppState>,
    Path((list_id, category_id)): Path<(String, String)>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let list_id = parse_id(&list_id, "listId")?;
    let category_id = parse_id(&category_id, "categoryId")?;
    ok_json(svc.items_by_list_and_category(list_id, category_id))
}

async fn update(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id, "id")?;
    ok_json(svc.update_item(id, patch))
}

/// Narrow operation: the body is `{"bought": <bool>}` and nothing else.
async fn toggle_bought(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_id(&id, "id")?;
    let bought = body_bool(&body, "bought").ok_or_else(|| {
        ApiError::from(ServiceError::Validation(
            "bought must be a boolean".to_string(),
        ))
    })?;
    ok_json(svc.set_bought(id, bought))
}

async fn remove(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "id")?;
    no_content(svc.delete_item(id))
}
