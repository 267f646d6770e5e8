//! Contact form body parsing.
//!
//! Runs ahead of CORS and rate limiting so malformed or oversized bodies are
//! refused before anything else sees them. The decoded [`ContactRequest`] is
//! stored in the request extensions for the handler.

use axum::{
    body::Body,
    extract::{FromRequest, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Form,
};
use http_body_util::LengthLimitError;

use crate::contact::ContactRequest;
use crate::web::error::ApiError;

/// Message returned for bodies that cannot be decoded.
pub const MALFORMED_BODY: &str = "malformed body";

/// Message returned for bodies above the size limit.
pub const BODY_TOO_LARGE: &str = "payload too large";

/// Maximum accepted body size in bytes.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

/// Supported body encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn from_headers(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return BodyKind::Other;
        };

        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" || essence.ends_with("+json") {
            BodyKind::Json
        } else if essence == "application/x-www-form-urlencoded" {
            BodyKind::Form
        } else {
            BodyKind::Other
        }
    }
}

/// Whether `err` (or anything it wraps) is a body length limit error.
fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

async fn decode(kind: BodyKind, bytes: axum::body::Bytes) -> Result<ContactRequest, ApiError> {
    if bytes.is_empty() || kind == BodyKind::Other {
        return Ok(ContactRequest::default());
    }

    match kind {
        BodyKind::Json => serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed JSON body");
            ApiError::bad_request(MALFORMED_BODY)
        }),
        BodyKind::Form => {
            let req = Request::builder()
                .method(Method::POST)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(bytes))
                .map_err(|_| ApiError::bad_request(MALFORMED_BODY))?;

            let Form(request) = Form::<ContactRequest>::from_request(req, &())
                .await
                .map_err(|e| {
                    tracing::debug!(error = %e, "Rejected malformed form body");
                    ApiError::bad_request(MALFORMED_BODY)
                })?;
            Ok(request)
        }
        BodyKind::Other => Ok(ContactRequest::default()),
    }
}

/// Decode a JSON or URL-encoded contact form body.
///
/// Non-POST requests pass through untouched. Bodies with any other content
/// type decode to an empty [`ContactRequest`].
pub async fn parse_contact_body(
    State(BodyLimit(limit)): State<BodyLimit>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let kind = BodyKind::from_headers(req.headers());
    let (parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) if is_length_limit(&e) => {
            tracing::debug!(limit, "Rejected oversized body");
            return ApiError::payload_too_large(BODY_TOO_LARGE).into_response();
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read request body");
            return ApiError::bad_request(MALFORMED_BODY).into_response();
        }
    };

    let request = match decode(kind, bytes).await {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    let mut req = Request::from_parts(parts, Body::empty());
    req.extensions_mut().insert(request);
    next.run(req).await
}
