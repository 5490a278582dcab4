mod cors;

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use scopefinder_core::AppError;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

use self::cors::build_cors_layer;

/// Transport settings that shape the router.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub frontend_url: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

pub fn build_router(app_state: AppState, options: RouterOptions) -> Result<Router, AppError> {
    let mut router = Router::new()
        .route("/api/health", get(handlers::health::health_handler))
        .route("/api/search", post(handlers::search::search_handler))
        .route(
            "/api/resolveGroup",
            post(handlers::resolve::resolve_group_handler),
        )
        .route(
            "/api/resolveApplication",
            post(handlers::resolve::resolve_application_handler),
        );

    if let Some(static_dir) = options.static_dir {
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    // Dropping the handler future on timeout abandons in-flight directory calls.
    let mut router = router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            options.request_timeout,
        ))
        .layer(TraceLayer::new_for_http());

    if let Some(frontend_url) = options.frontend_url.as_deref() {
        router = router.layer(build_cors_layer(frontend_url)?);
    }

    Ok(router.with_state(app_state))
}
