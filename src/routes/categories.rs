use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    schemas::{validate_input, InferCategoryInput},
    services::{
        catalog::CategoryCatalog,
        expense_categorization::{infer_category, CategoryMatch},
    },
    state::AppState,
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/categories", axum::routing::get(list_categories))
        .route("/categories/infer", axum::routing::post(infer))
}

async fn list_categories(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "data": state.catalog.entries() }))
}

async fn infer(
    State(state): State<AppState>,
    Json(payload): Json<InferCategoryInput>,
) -> AppResult<Json<Value>> {
    validate_input(&payload)?;

    let body = match payload.catalog {
        Some(seeds) => {
            let catalog = CategoryCatalog::from_seeds(seeds)?;
            match_body(infer_category(&payload.expense_type, &catalog, &state.keywords))
        }
        None => match_body(infer_category(
            &payload.expense_type,
            &state.catalog,
            &state.keywords,
        )),
    };
    Ok(Json(body))
}

fn match_body(matched: CategoryMatch<'_>) -> Value {
    json!({
        "category": matched.name(),
        "color": matched.category.color,
        "matched_by": matched.rule,
    })
}
