//! Middleware for Web API.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{require_read_access, require_write_access, session_token, CurrentSession};
pub use cors::create_cors_layer;
pub use rate_limit::{auth_rate_limit, RateLimitState};
