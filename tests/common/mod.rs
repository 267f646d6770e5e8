//! Test helpers for Web API tests.
//!
//! Provides a recording mail transport and a ready-made test configuration.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};

use contact_relay::config::{Config, LoggingConfig, MailConfig, ServerConfig, SmtpConfig};
use contact_relay::rate_limit::RateLimitConfig;
use contact_relay::web::handlers::AppState;
use contact_relay::web::middleware::RateLimitState;
use contact_relay::web::router::create_router;
use contact_relay::{MailTransport, OutgoingMail, RelayError};

/// Origin configured for tests.
pub const ALLOWED_ORIGIN: &str = "https://www.example.com";

/// Mail transport that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingTransport {
    /// A transport whose sends all succeed.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A transport whose sends all fail.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    /// Number of send attempts, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Messages successfully sent.
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> contact_relay::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RelayError::Transport(
                "535 5.7.8 authentication failed for relay@smtp.test".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// Create a test configuration.
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origin: ALLOWED_ORIGIN.to_string(),
            trust_proxy: true,
            body_limit_bytes: 100 * 1024,
        },
        smtp: SmtpConfig {
            host: "smtp.test".to_string(),
            port: 465,
            secure: true,
            username: "relay@smtp.test".to_string(),
            password: "secret".to_string(),
            timeout_secs: 5,
        },
        mail: MailConfig {
            from: "Contact form <relay@example.com>".to_string(),
            to: "owner@example.com".to_string(),
        },
        logging: LoggingConfig::default(),
    }
}

/// Create a test server relaying through `transport`.
pub fn create_test_server(transport: Arc<RecordingTransport>) -> TestServer {
    let config = create_test_config();
    let app_state = Arc::new(AppState::new(transport, config.mail.clone()));
    let rate_limit = RateLimitState::new(RateLimitConfig::default(), config.server.trust_proxy);
    let router = create_router(app_state, rate_limit, &config.server);

    TestServer::new(router).expect("Failed to create test server")
}

/// A complete, valid submission.
pub fn valid_submission() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "phone": "+44 20 7946 0000",
        "subject": "Analytical engine",
        "message": "Could we talk about Bernoulli numbers?",
        "website": ""
    })
}
