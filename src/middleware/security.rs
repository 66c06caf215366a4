use axum::extract::{Request, State};
use axum::http::header::HOST;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// Reject requests whose `Host` is not listed in `TRUSTED_HOSTS`.
///
/// HTTP/2 clients send `:authority`, which lands in the URI instead of a header.
pub async fn enforce_trusted_hosts(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.config.allows_any_host() {
        return Ok(next.run(request).await);
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .map(strip_port)
        .unwrap_or_default();

    let trusted = state
        .config
        .trusted_hosts
        .iter()
        .any(|candidate| candidate.trim().eq_ignore_ascii_case(host));
    if !trusted {
        tracing::warn!(host, "Rejected request for untrusted host");
        return Err(AppError::Forbidden("Host is not allowed.".to_string()));
    }

    Ok(next.run(request).await)
}

fn strip_port(host: &str) -> &str {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
