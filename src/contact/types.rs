//! Contact form types.

use serde::Deserialize;
use serde_json::Value;

/// Decoded request body for `POST /api/contact`.
///
/// Every field is optional at this stage; absence is reported by the
/// validator, not by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// Sender's first name.
    pub first_name: Option<String>,
    /// Sender's last name.
    pub last_name: Option<String>,
    /// Sender's email address, used as reply-to.
    pub email: Option<String>,
    /// Sender's phone number.
    pub phone: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Message text.
    pub message: Option<String>,
    /// Honeypot. Hidden from humans, must stay empty.
    ///
    /// Kept untyped so a bot posting a number or a flag here is still
    /// recognised instead of failing to decode.
    pub website: Option<Value>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Result of validating a [`ContactRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The honeypot was filled in. Report success, send nothing.
    SilentAccept,
    /// One or more required fields were missing or blank.
    Rejected {
        /// Wire names of the missing fields.
        missing: Vec<&'static str>,
    },
    /// Ready to relay.
    Valid(ContactSubmission),
}
