//! CORS middleware configuration.
//!
//! [`create_cors_layer`] answers preflight requests and decorates responses
//! for the configured origin. Browsers enforce those headers, but the request
//! itself would still reach the handler, so [`require_allowed_origin`] also
//! refuses any request whose `Origin` does not match.

use axum::{
    body::Body,
    extract::State,
    http::{header::ORIGIN, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::web::error::ApiError;

/// Message returned when the origin check fails.
pub const ORIGIN_NOT_ALLOWED: &str = "origin not allowed";

/// Origin permitted to call the contact endpoint.
#[derive(Debug, Clone)]
pub struct AllowedOrigin(Option<HeaderValue>);

impl AllowedOrigin {
    /// Parse the configured origin. An unparseable value allows no browser origin.
    pub fn new(origin: &str) -> Self {
        match origin.parse::<HeaderValue>() {
            Ok(value) => Self(Some(value)),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS origin, browser requests will be refused");
                Self(None)
            }
        }
    }

    /// Whether `origin` is the configured one.
    pub fn matches(&self, origin: &HeaderValue) -> bool {
        self.0.as_ref() == Some(origin)
    }
}

/// Create the CORS layer for the contact endpoint: POST only, one origin.
pub fn create_cors_layer(allowed: &AllowedOrigin) -> CorsLayer {
    let origin = match &allowed.0 {
        Some(value) => AllowOrigin::list([value.clone()]),
        None => AllowOrigin::list(std::iter::empty::<HeaderValue>()),
    };

    CorsLayer::new()
        .allow_methods([Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_origin(origin)
}

/// Refuse requests that carry a foreign `Origin` header.
///
/// Requests without an `Origin` header (curl, server-to-server) pass.
pub async fn require_allowed_origin(
    State(allowed): State<AllowedOrigin>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(origin) = req.headers().get(ORIGIN) {
        if !allowed.matches(origin) {
            tracing::warn!(origin = ?origin, "Rejected request from disallowed origin");
            return ApiError::forbidden(ORIGIN_NOT_ALLOWED).into_response();
        }
    }

    next.run(req).await
}
