//! Rendering a submission into an outgoing message.

use crate::config::MailConfig;
use crate::mail::OutgoingMail;

use super::types::ContactSubmission;
use super::validation::sanitize_header;

/// Placeholder written in place of an absent phone number.
pub const MISSING_PHONE: &str = "-";

/// Build the message relayed for a valid submission.
pub fn compose(submission: &ContactSubmission, mail: &MailConfig) -> OutgoingMail {
    let subject = sanitize_header(&format!(
        "[Contact] {} — {} {}",
        submission.subject, submission.first_name, submission.last_name
    ));

    let text = format!(
        "Name: {} {}\n\
         Email: {}\n\
         Phone: {}\n\
         Subject: {}\n\
         \n\
         Message:\n\
         {}\n",
        submission.first_name,
        submission.last_name,
        submission.email,
        submission.phone.as_deref().unwrap_or(MISSING_PHONE),
        submission.subject,
        submission.message,
    );

    OutgoingMail {
        from: mail.from.clone(),
        to: mail.to.clone(),
        reply_to: sanitize_header(&submission.email),
        subject,
        text,
    }
}
