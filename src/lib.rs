//! contact-relay
//!
//! Accepts contact form submissions over HTTP and relays them by SMTP to a
//! fixed recipient.

pub mod config;
pub mod contact;
pub mod error;
pub mod logging;
pub mod mail;
pub mod rate_limit;
pub mod web;

pub use config::Config;
pub use contact::{ContactRequest, ContactSubmission, Outcome};
pub use error::{RelayError, Result};
pub use mail::{MailTransport, OutgoingMail, SmtpMailer};
pub use rate_limit::{RateLimitConfig, RateLimitResult, RateLimiter};
pub use web::WebServer;
