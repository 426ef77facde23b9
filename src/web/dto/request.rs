//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::no_control_chars;

/// PIN verification request.
#[derive(Debug, Deserialize, Validate)]
pub struct PinRequest {
    #[validate(length(min = 1, message = "PIN is required"))]
    pub pin: String,
}

/// Admin login request.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(
        length(min = 1, max = 128, message = "Username is required"),
        custom(function = "no_control_chars")
    )]
    pub username: String,
    #[validate(length(min = 1, max = 1024, message = "Password is required"))]
    pub password: String,
}
