//! Response DTOs for the Web API.

use serde::Serialize;

/// Body of every contact endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    /// Whether the submission was accepted.
    pub success: bool,
    /// Caller-facing error message, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// `{"success": true}`.
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// `{"success": false, "error": message}`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}
