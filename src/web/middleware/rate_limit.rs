//! Rate limiting middleware.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};

use crate::rate_limit::{RateLimitConfig, RateLimitResult, RateLimiter};
use crate::web::error::ApiError;

/// Message returned when the limit is exceeded.
pub const TOO_MANY_REQUESTS: &str = "too many requests";

/// State for rate limiting.
#[derive(Clone)]
pub struct RateLimitState {
    /// Per-caller limiter for the contact endpoint.
    limiter: Arc<RateLimiter>,
    /// Trust forwarding headers when identifying callers.
    trust_proxy: bool,
}

impl RateLimitState {
    /// Create a new rate limit state.
    pub fn new(config: RateLimitConfig, trust_proxy: bool) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::new(config)),
            trust_proxy,
        }
    }

    /// The underlying limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Start a background task that drops expired windows once per window length.
    pub fn start_cleanup_task(&self) {
        let limiter = self.limiter.clone();
        let period = limiter.config().window;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Skip the first immediate tick
            interval.tick().await;
            loop {
                interval.tick().await;
                limiter.cleanup();
                tracing::debug!(
                    tracked = limiter.tracked_keys(),
                    "Rate limit windows cleaned up"
                );
            }
        });
    }
}

/// Extract the caller key from a request.
fn client_key(req: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy {
        // Take the first IP in the chain
        if let Some(ip) = req
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_string();
        }

        if let Some(real_ip) = req
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
        {
            return real_ip.trim().to_string();
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Whole seconds, rounded up.
fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn insert_quota_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset: Duration) {
    headers.insert("RateLimit-Limit", HeaderValue::from(limit));
    headers.insert("RateLimit-Remaining", HeaderValue::from(remaining));
    headers.insert("RateLimit-Reset", HeaderValue::from(ceil_secs(reset)));
}

/// Rate limiting middleware for the contact endpoint.
pub async fn contact_rate_limit(
    State(state): State<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&req, state.trust_proxy);
    let limit = state.limiter.config().max_requests;

    match state.limiter.check(&key) {
        RateLimitResult::Allowed {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(req).await;
            insert_quota_headers(response.headers_mut(), limit, remaining, reset_after);
            response
        }
        RateLimitResult::Denied { retry_after } => {
            tracing::warn!(client = %key, "Contact rate limit exceeded");
            let mut response = ApiError::too_many_requests(TOO_MANY_REQUESTS).into_response();
            let headers = response.headers_mut();
            insert_quota_headers(headers, limit, 0, retry_after);
            headers.insert("Retry-After", HeaderValue::from(ceil_secs(retry_after)));
            response
        }
    }
}
