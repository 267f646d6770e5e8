//! Contact form submissions.
//!
//! Decoding leaves every field optional ([`ContactRequest`]); [`validate`]
//! turns a request into an [`Outcome`], and [`compose`] renders a valid
//! [`ContactSubmission`] into the message handed to the mail transport.

mod compose;
mod types;
mod validation;

pub use compose::{compose, MISSING_PHONE};
pub use types::{ContactRequest, ContactSubmission, Outcome};
pub use validation::{sanitize_header, sanitize_string, validate, MISSING_FIELDS};
