use axum::{extract::State, routing::get, Json, Router};

use crate::model::Unit;
use super::{ok_json, ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/units", get(list_all))
}

async fn list_all(State(svc): State<AppState>) -> Result<Json<Vec<Unit>>, ApiError> {
    ok_json(svc.list_units())
}
