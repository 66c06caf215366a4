use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "now": Utc::now().to_rfc3339(),
        "categories": state.catalog.len(),
        "keywords": state.keywords.len()
    }))
}
