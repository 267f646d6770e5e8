//! Contact form handler.

use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::config::MailConfig;
use crate::contact::{compose, validate, ContactRequest, Outcome, MISSING_FIELDS};
use crate::mail::MailTransport;
use crate::web::dto::StatusResponse;
use crate::web::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Transport used to relay submissions.
    pub mailer: Arc<dyn MailTransport>,
    /// Sender and recipient for relayed messages.
    pub mail: MailConfig,
}

impl AppState {
    /// Create a new application state.
    pub fn new(mailer: Arc<dyn MailTransport>, mail: MailConfig) -> Self {
        Self { mailer, mail }
    }
}

/// POST /api/contact - Relay a contact form submission.
///
/// The body is decoded by the body-parsing middleware and arrives as an
/// extension. Exactly one send is attempted for a valid submission.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Extension(request): Extension<ContactRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let submission = match validate(&request) {
        Outcome::SilentAccept => {
            tracing::debug!("Honeypot field filled, discarding submission");
            return Ok(Json(StatusResponse::ok()));
        }
        Outcome::Rejected { missing } => {
            tracing::debug!(?missing, "Rejected contact submission");
            return Err(ApiError::bad_request(MISSING_FIELDS));
        }
        Outcome::Valid(submission) => submission,
    };

    let mail = compose(&submission, &state.mail);
    state.mailer.send(&mail).await?;

    tracing::info!("Contact submission relayed");
    Ok(Json(StatusResponse::ok()))
}
