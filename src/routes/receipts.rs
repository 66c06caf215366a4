use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    schemas::{validate_input, ReceiptDraftInput},
    services::{
        expense_draft::build_expense_draft,
        receipt::{parse_extraction_response, ExtractedReceiptData},
    },
    state::AppState,
};

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/receipts/draft", axum::routing::post(draft_from_receipt))
}

async fn draft_from_receipt(
    State(state): State<AppState>,
    Json(payload): Json<ReceiptDraftInput>,
) -> AppResult<Json<Value>> {
    validate_input(&payload)?;

    let extracted = match (payload.extracted.as_ref(), payload.raw_text.as_deref()) {
        (Some(value), None) if value.is_object() => ExtractedReceiptData::from_value(value),
        (Some(_), None) => {
            return Err(AppError::BadRequest(
                "extracted must be a JSON object.".to_string(),
            ))
        }
        (None, Some(raw_text)) => parse_extraction_response(raw_text),
        _ => {
            return Err(AppError::BadRequest(
                "Provide exactly one of extracted or raw_text.".to_string(),
            ))
        }
    };

    let draft = build_expense_draft(
        &extracted,
        &state.catalog,
        &state.keywords,
        payload.recurring_period,
    );
    Ok(Json(json!({ "draft": draft, "extracted": extracted })))
}
