//! HTTP API for LocalShare.
//!
//! Routes live under `/api`, plus `/health` and the optional frontend.
//! Handlers receive an `Arc<AppState>`; access gates run as route-layer
//! middleware in front of the file routes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
