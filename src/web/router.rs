//! Router configuration for the Web API.

use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{submit_contact, AppState};
use super::middleware::{
    contact_rate_limit, create_cors_layer, parse_contact_body, require_allowed_origin,
    security_headers, AllowedOrigin, BodyLimit, RateLimitState,
};
use crate::config::ServerConfig;

/// Liveness token returned by `GET /health`.
pub const HEALTH_OK: &str = "OK";

/// Create the main router: the guarded contact endpoint plus `/health`.
///
/// Middleware order for `POST /api/contact`, outermost first: security
/// headers, body parsing, CORS, origin check, rate limiting.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit: RateLimitState,
    server: &ServerConfig,
) -> Router {
    let allowed_origin = AllowedOrigin::new(&server.cors_origin);

    let contact_routes = Router::new()
        .route("/contact", post(submit_contact))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(
                    BodyLimit(server.body_limit_bytes),
                    parse_contact_body,
                ))
                .layer(create_cors_layer(&allowed_origin))
                .layer(middleware::from_fn_with_state(
                    allowed_origin,
                    require_allowed_origin,
                ))
                .layer(middleware::from_fn_with_state(
                    rate_limit,
                    contact_rate_limit,
                )),
        );

    Router::new()
        .nest("/api", contact_routes)
        .with_state(app_state)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers)),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    HEALTH_OK
}
