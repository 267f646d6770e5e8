//! Middleware for the Web API.

pub mod body;
pub mod cors;
pub mod rate_limit;
pub mod security;

pub use body::{parse_contact_body, BodyLimit};
pub use cors::{create_cors_layer, require_allowed_origin, AllowedOrigin};
pub use rate_limit::{contact_rate_limit, RateLimitState};
pub use security::security_headers;
