//! Submission validation and sanitising.

use serde_json::Value;

use super::types::{ContactRequest, ContactSubmission, Outcome};

/// Error message returned to callers when required fields are absent.
pub const MISSING_FIELDS: &str = "missing fields";

/// Sanitize a string by removing control characters except newlines, carriage returns, and tabs.
pub fn sanitize_string(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\r' || *c == '\t')
        .collect()
}

/// Reduce a value to a single header-safe line.
///
/// Line breaks and tabs become spaces, other control characters are dropped.
pub fn sanitize_header(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\r' | '\n' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// A required value is present when anything survives control-character
/// removal. Surrounding whitespace is trimmed from what is kept.
fn required(value: Option<&str>) -> Option<String> {
    let cleaned = sanitize_string(value?);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.trim().to_string())
    }
}

/// Sanitised, trimmed optional value, or `None` when nothing is left.
fn optional(value: Option<&str>) -> Option<String> {
    required(value).filter(|v| !v.is_empty())
}

/// Whether the honeypot holds anything a form would treat as filled in.
///
/// `null`, `false`, `0` and `""` count as empty. Whitespace does not.
fn honeypot_filled(website: Option<&Value>) -> bool {
    match website {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Decide what to do with a contact request.
///
/// The honeypot is checked first. Required fields are then checked in wire
/// order.
pub fn validate(request: &ContactRequest) -> Outcome {
    if honeypot_filled(request.website.as_ref()) {
        return Outcome::SilentAccept;
    }

    let first_name = required(request.first_name.as_deref());
    let last_name = required(request.last_name.as_deref());
    let email = required(request.email.as_deref());
    let subject = required(request.subject.as_deref());
    let message = required(request.message.as_deref());

    match (first_name, last_name, email, subject, message) {
        (Some(first_name), Some(last_name), Some(email), Some(subject), Some(message)) => {
            Outcome::Valid(ContactSubmission {
                first_name,
                last_name,
                email,
                phone: optional(request.phone.as_deref()),
                subject,
                message,
            })
        }
        (first_name, last_name, email, subject, message) => {
            let missing = [
                ("firstName", first_name.is_none()),
                ("lastName", last_name.is_none()),
                ("email", email.is_none()),
                ("subject", subject.is_none()),
                ("message", message.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            Outcome::Rejected { missing }
        }
    }
}
