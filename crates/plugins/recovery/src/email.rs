//! Outbound message formatting for the recovery flow.

use harvest_auth_core::traits::MailMessage;

/// Builds the verification-code email for a recovery request.
///
/// The code reaches the user only through this message; it is never
/// echoed in an API response.
pub fn verification_code_message(to: &str, username: &str, code: &str, ttl_secs: i64) -> MailMessage {
    let minutes = ttl_secs / 60;
    let subject = "Your Harvest Market verification code";

    let text_body = format!(
        "Hi {username},\n\n\
         We received a request to reset the password on your Harvest Market account.\n\n\
         Your verification code is: {code}\n\n\
         The code is valid for the next {minutes} minutes. Do not share it with anyone.\n\n\
         If you did not request this, you can ignore this message and your password\n\
         will stay unchanged.\n\n\
         The Harvest Market Team"
    );

    let html_body = format!(
        "<p>Hi {username},</p>\
         <p>We received a request to reset the password on your Harvest Market account.</p>\
         <p>Your verification code is:</p>\
         <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\
         <p>The code is valid for the next {minutes} minutes. Do not share it with anyone.</p>\
         <p>If you did not request this, you can ignore this message and your password \
         will stay unchanged.</p>\
         <p>The Harvest Market Team</p>"
    );

    MailMessage::new(to, subject, html_body, text_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_code_and_ttl() {
        let message = verification_code_message("alice@example.com", "alice", "042317", 600);

        assert_eq!(message.to, "alice@example.com");
        assert!(message.text_body.contains("042317"));
        assert!(message.html_body.contains("042317"));
        assert!(message.text_body.contains("10 minutes"));
    }
}
