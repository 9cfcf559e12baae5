use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use grocer_core::ServiceError;

use crate::model::ListStats;
use super::{ok_json, parse_id, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/statistics/monthly", get(monthly))
        .route("/statistics/list/{id}", get(per_list))
}

async fn monthly(
    State(svc): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ListStats>>, ApiError> {
    let month = params.get("month").ok_or_else(|| {
        ApiError::from(ServiceError::Validation(
            "month query parameter is required".to_string(),
        ))
    })?;
    ok_json(svc.monthly_stats(month))
}

async fn per_list(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListStats>, ApiError> {
    let id = parse_id(&id, "id")?;
    ok_json(svc.list_stats(id))
}
