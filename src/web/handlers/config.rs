//! Configuration and health handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{ConfigResponse, HealthResponse};

/// GET /api/config - Public server configuration.
///
/// Lets the frontend decide whether to show the PIN prompt and the admin
/// login before calling protected routes.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        pin_protected: state.policy.pin_protected,
        admin_required: state.policy.admin_required,
        max_file_size: state.max_file_size,
    })
}

/// GET /health - Liveness check.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "localshare",
    })
}
