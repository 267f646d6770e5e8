//! Web API Contact Tests
//!
//! Integration tests for the contact endpoint and its middleware chain.

mod common;

use axum::http::header::ORIGIN;
use axum::http::{HeaderName, Method, StatusCode};
use axum::body::Bytes;
use common::{create_test_server, valid_submission, RecordingTransport, ALLOWED_ORIGIN};
use serde_json::{json, Value};

const FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

// ============================================================================
// Honeypot Tests
// ============================================================================

#[tokio::test]
async fn test_honeypot_silently_accepted() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let mut body = valid_submission();
    body["website"] = json!("http://cheap-pills.example");

    let response = server.post("/api/contact").json(&body).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"success": true}));
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_honeypot_with_missing_fields_still_succeeds() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let response = server
        .post("/api/contact")
        .json(&json!({"website": "spam"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["success"], true);
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_numeric_honeypot_silently_accepted() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let mut body = valid_submission();
    body["website"] = json!(1);

    let response = server.post("/api/contact").json(&body).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"success": true}));
    assert_eq!(transport.attempts(), 0);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
async fn test_missing_required_fields_rejected() {
    for field in ["firstName", "lastName", "email", "subject", "message"] {
        let transport = RecordingTransport::new();
        let server = create_test_server(transport.clone());

        let mut body = valid_submission();
        body.as_object_mut().unwrap().remove(field);

        let response = server.post("/api/contact").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({"success": false, "error": "missing fields"}),
            "removing {field}"
        );
        assert_eq!(transport.attempts(), 0, "removing {field}");
    }
}

#[tokio::test]
async fn test_empty_required_field_rejected() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let mut body = valid_submission();
    body["email"] = json!("");

    let response = server.post("/api/contact").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_malformed_json_rejected_before_handler() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let response = server
        .post("/api/contact")
        .bytes(Bytes::from_static(b"{\"firstName\": "))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let mut body = valid_submission();
    body["message"] = json!("x".repeat(200 * 1024));

    let response = server.post("/api/contact").json(&body).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(transport.attempts(), 0);
}

// ============================================================================
// Relay Tests
// ============================================================================

#[tokio::test]
async fn test_valid_submission_relayed() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let response = server.post("/api/contact").json(&valid_submission()).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"success": true}));

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let mail = &sent[0];
    assert_eq!(mail.from, "Contact form <relay@example.com>");
    assert_eq!(mail.to, "owner@example.com");
    assert_eq!(mail.reply_to, "ada@example.com");
    assert_eq!(mail.subject, "[Contact] Analytical engine — Ada Lovelace");
    assert!(mail.text.contains("+44 20 7946 0000"));
    assert!(mail.text.contains("Could we talk about Bernoulli numbers?"));
}

#[tokio::test]
async fn test_free_text_email_relayed() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let mut body = valid_submission();
    body["email"] = json!("ada at example dot com");
    body["subject"] = json!("   ");

    let response = server.post("/api/contact").json(&body).await;

    response.assert_status_ok();
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("Email: ada at example dot com\n"));
}

#[tokio::test]
async fn test_missing_phone_uses_placeholder() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let mut body = valid_submission();
    body.as_object_mut().unwrap().remove("phone");

    server
        .post("/api/contact")
        .json(&body)
        .await
        .assert_status_ok();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.contains("Phone: -\n"));
}

#[tokio::test]
async fn test_form_encoded_submission() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let response = server
        .post("/api/contact")
        .form(&[
            ("firstName", "Grace"),
            ("lastName", "Hopper"),
            ("email", "grace@example.com"),
            ("subject", "Compilers"),
            ("message", "Hello & welcome"),
            ("website", ""),
        ])
        .await;

    response.assert_status_ok();
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "[Contact] Compilers — Grace Hopper");
    assert!(sent[0].text.contains("Hello & welcome"));
}

#[tokio::test]
async fn test_transport_failure_is_hidden() {
    let transport = RecordingTransport::failing();
    let server = create_test_server(transport.clone());

    let response = server.post("/api/contact").json(&valid_submission()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body, json!({"success": false, "error": "server error"}));
    assert!(!response.text().contains("535"));
    assert_eq!(transport.attempts(), 1);

    // The server keeps serving after a relay failure.
    server.get("/health").await.assert_status_ok();
    server
        .post("/api/contact")
        .json(&valid_submission())
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(transport.attempts(), 2);
}

// ============================================================================
// CORS Tests
// ============================================================================

#[tokio::test]
async fn test_allowed_origin() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let response = server
        .post("/api/contact")
        .add_header(ORIGIN, ALLOWED_ORIGIN)
        .json(&valid_submission())
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        ALLOWED_ORIGIN
    );
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test]
async fn test_disallowed_origin_never_reaches_handler() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    let response = server
        .post("/api/contact")
        .add_header(ORIGIN, "https://evil.example")
        .json(&valid_submission())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["success"], false);
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_preflight() {
    let server = create_test_server(RecordingTransport::new());

    let response = server
        .method(Method::OPTIONS, "/api/contact")
        .add_header(ORIGIN, ALLOWED_ORIGIN)
        .add_header(
            HeaderName::from_static("access-control-request-method"),
            "POST",
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        ALLOWED_ORIGIN
    );
    assert_eq!(response.header("access-control-allow-methods"), "POST");
}

// ============================================================================
// Rate Limit Tests
// ============================================================================

#[tokio::test]
async fn test_eleventh_request_rate_limited() {
    let transport = RecordingTransport::new();
    let server = create_test_server(transport.clone());

    for i in 0..10 {
        // Alternate valid and invalid bodies; both count.
        let body = if i % 2 == 0 {
            valid_submission()
        } else {
            json!({})
        };
        let response = server
            .post("/api/contact")
            .add_header(FORWARDED_FOR, "203.0.113.10")
            .json(&body)
            .await;
        assert_ne!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    let response = server
        .post("/api/contact")
        .add_header(FORWARDED_FOR, "203.0.113.10")
        .json(&valid_submission())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "error": "too many requests"})
    );
    assert!(response.headers().get("retry-after").is_some());
    assert_eq!(response.header("ratelimit-remaining"), "0");
    assert_eq!(transport.attempts(), 5);

    // A different caller still gets through.
    server
        .post("/api/contact")
        .add_header(FORWARDED_FOR, "198.51.100.20")
        .json(&valid_submission())
        .await
        .assert_status_ok();
}

// ============================================================================
// Health and Headers Tests
// ============================================================================

#[tokio::test]
async fn test_health_unaffected_by_guards() {
    let transport = RecordingTransport::failing();
    let server = create_test_server(transport);

    // Exhaust the contact limit for this caller.
    for _ in 0..11 {
        server
            .post("/api/contact")
            .add_header(FORWARDED_FOR, "203.0.113.30")
            .json(&valid_submission())
            .await;
    }

    for _ in 0..20 {
        let response = server
            .get("/health")
            .add_header(FORWARDED_FOR, "203.0.113.30")
            .add_header(ORIGIN, "https://evil.example")
            .await;

        response.assert_status_ok();
        response.assert_text("OK");
    }
}

#[tokio::test]
async fn test_security_headers_on_all_routes() {
    let server = create_test_server(RecordingTransport::new());

    let health = server.get("/health").await;
    assert_eq!(health.header("x-content-type-options"), "nosniff");
    assert_eq!(health.header("x-frame-options"), "SAMEORIGIN");

    let contact = server.post("/api/contact").json(&json!({})).await;
    assert_eq!(contact.header("x-content-type-options"), "nosniff");
    assert!(contact.headers().get("strict-transport-security").is_some());
}
