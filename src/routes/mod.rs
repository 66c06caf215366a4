use axum::{routing::get, Router};

use crate::error::AppError;
use crate::state::AppState;

pub mod categories;
pub mod health;
pub mod receipts;

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .merge(categories::router())
        .merge(receipts::router())
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found.".to_string())
}
