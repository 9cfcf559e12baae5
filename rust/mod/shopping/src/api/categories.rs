use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::model::Category;
use super::{body_str, created_json, no_content, ok_json, parse_id, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_all).post(create))
        .route("/categories/{id}", axum::routing::delete(remove))
}

async fn list_all(State(svc): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    ok_json(svc.list_categories())
}

async fn create(
    State(svc): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = body_str(&body, "name").unwrap_or_default();
    let icon_name = body_str(&body, "iconName");
    created_json(svc.create_category(&name, icon_name.as_deref()))
}

async fn remove(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "id")?;
    no_content(svc.delete_category(id))
}
