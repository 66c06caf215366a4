mod config;
mod error;
mod middleware;
mod routes;
mod schemas;
mod services;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{middleware::from_fn_with_state, Router};
use config::AppConfig;
use middleware::cors::build_cors_layer;
use middleware::request_id::inject_request_id;
use middleware::security::enforce_trusted_hosts;
use state::AppState;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env();
    let state = AppState::build(config)?;

    let app = build_app(state.clone())?;

    let socket_addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(socket_addr).await?;

    tracing::info!(
        app_name = %state.config.app_name,
        environment = %state.config.environment,
        api_prefix = %state.config.api_prefix,
        %socket_addr,
        "Categorization service listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

fn build_app(state: AppState) -> Result<Router, Box<dyn std::error::Error>> {
    let api = if state.config.api_prefix == "/" {
        Router::new().merge(routes::v1_router())
    } else {
        Router::new().nest(&state.config.api_prefix, routes::v1_router())
    };

    let mut app: Router = api
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(state.config.request_timeout_seconds),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config))
        .layer(from_fn_with_state(state.clone(), enforce_trusted_hosts))
        .with_state(state.clone());

    // Rate limiting keys on the peer address, so it needs `ConnectInfo`.
    if state.config.rate_limit_enabled {
        let governor_config = GovernorConfigBuilder::default()
            .per_second(state.config.rate_limit_per_second)
            .burst_size(state.config.rate_limit_burst_size)
            .finish()
            .ok_or("RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST_SIZE must be positive")?;
        app = app.layer(GovernorLayer::new(governor_config));
    } else if state.config.is_production() {
        tracing::warn!("Rate limiting is disabled in production");
    }

    // Outermost, so rejections from the layers above still carry the id.
    Ok(app.layer(axum::middleware::from_fn(inject_request_id)))
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "Could not register SIGTERM handler");
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    tracing::info!("Shutdown signal received, finishing in-flight requests");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
