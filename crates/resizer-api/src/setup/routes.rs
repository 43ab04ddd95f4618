//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use resizer_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = config.server.max_direct_upload_bytes;
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs.max(1));
    tracing::info!(
        body_limit,
        request_timeout_secs = request_timeout.as_secs(),
        "HTTP limits configured"
    );

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/upload-url", get(handlers::upload_url::issue_upload_url))
        .route(
            "/resize",
            post(handlers::resize::resize_image)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .route(
            "/resize/staged",
            post(handlers::resize_staged::resize_staged_image),
        )
        // Other methods on known paths are treated as unknown routes.
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let origins = &config.server.cors_origins;
    let cors = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
