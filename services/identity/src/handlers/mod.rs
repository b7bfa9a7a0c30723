pub mod auth;
pub mod directory;
pub mod extract;
pub mod guard;
pub mod me;
pub mod permission;
pub mod profile;
pub mod role;
pub mod user;

use serde::Serialize;

use prestige_core::envelope::{ApiMessage, ApiResponse};

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn email_not_sent() -> ApiMessage {
    ApiMessage::new("EmailNotSent", "the email could not be delivered")
}

/// Envelope for operations that end by sending an email. A failed delivery
/// keeps the state change but is surfaced as a warning.
pub fn mailed<T>(data: T, email_sent: bool) -> ApiResponse<T> {
    let response = ApiResponse::ok(data);
    if email_sent {
        response
    } else {
        response.with_warning(email_not_sent())
    }
}
