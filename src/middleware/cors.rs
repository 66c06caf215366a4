use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::middleware::request_id::REQUEST_ID_HEADER;

pub fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)]);

    if config
        .cors_origins
        .iter()
        .any(|origin| origin.trim() == "*")
    {
        return layer.allow_origin(Any);
    }

    let origins = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect::<Vec<_>>();
    layer.allow_origin(origins)
}
