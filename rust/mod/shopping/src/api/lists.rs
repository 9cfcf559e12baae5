use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use grocer_core::ServiceError;

use crate::model::List;
use crate::validate;
use super::{body_str, created_json, no_content, ok_json, parse_id, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lists", get(list_all).post(create))
        .route("/lists/{id}", axum::routing::put(rename).delete(remove))
}

/// Pull the list name out of a payload: required here, then length-checked
/// by the validator (which itself would accept an empty name — the two
/// layers deliberately disagree, see DESIGN.md).
fn require_valid_name(body: &serde_json::Value) -> Result<String, ApiError> {
    let name = match body_str(body, "name") {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(ApiError::from(ServiceError::Validation(
                "name is required".to_string(),
            )))
        }
    };

    let errors = validate::validate_list(Some(&name));
    if !errors.is_empty() {
        return Err(ApiError::from(ServiceError::Validation(
            validate::to_message(&errors),
        )));
    }
    Ok(name)
}

async fn create(
    State(svc): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<List>), ApiError> {
    let name = require_valid_name(&body)?;
    created_json(svc.create_list(&name))
}

async fn list_all(State(svc): State<AppState>) -> Result<Json<Vec<List>>, ApiError> {
    ok_json(svc.list_lists())
}

async fn rename(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<List>, ApiError> {
    let id = parse_id(&id, "id")?;
    let name = require_valid_name(&body)?;
    ok_json(svc.rename_list(id, &name))
}

async fn remove(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "id")?;
    no_content(svc.delete_list(id))
}
