//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::handlers::{
    admin_login, admin_logout, delete_file, delete_file_named_upload, download_file, get_config,
    health_check, list_files, upload_file, verify_pin_handler, AppState,
};
use super::middleware::{
    auth_rate_limit, create_cors_layer, require_read_access, require_write_access, RateLimitState,
};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit_state: Arc<RateLimitState>,
    cors_origins: &[String],
) -> Router {
    // Credential routes, throttled per client address
    let credential_routes = Router::new()
        .route("/verify-pin", post(verify_pin_handler))
        .route("/admin/login", post(admin_login))
        .route_layer(middleware::from_fn(move |req, next| {
            let state = rate_limit_state.clone();
            auth_rate_limit(state, req, next)
        }));

    // Public routes
    let public_routes = Router::new()
        .route("/config", get(get_config))
        .route("/admin/logout", post(admin_logout));

    // File routes (PIN required)
    let read_routes = Router::new()
        .route("/", get(list_files))
        .route("/download/:filename", get(download_file))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_read_access,
        ));

    // File routes (PIN and admin required)
    let write_routes = Router::new()
        .route(
            "/upload",
            post(upload_file)
                .delete(delete_file_named_upload)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/:filename", delete(delete_file))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_write_access,
        ));

    let api_routes = Router::new()
        .merge(credential_routes)
        .merge(public_routes)
        .nest("/files", read_routes.merge(write_routes))
        .fallback(api_not_found);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Fallback for unknown API paths.
async fn api_not_found(uri: Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "Unknown API route");
    ApiError::not_found("Not found")
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the router serving the built frontend.
///
/// `/assets` is served from `<static_path>/assets`; every other path falls
/// back to `index.html` so client-side routes resolve. Returns `None` if
/// `index.html` is missing.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let root = Path::new(static_path);
    let index = root.join("index.html");
    if !index.is_file() {
        tracing::warn!(path = %index.display(), "Static files not found; frontend disabled");
        return None;
    }

    Some(
        Router::new()
            .nest_service("/assets", ServeDir::new(root.join("assets")))
            .fallback_service(ServeDir::new(root).fallback(ServeFile::new(index))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_router() {
        let response = create_health_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "localshare");
    }

    #[test]
    fn test_static_router_requires_index() {
        let temp_dir = TempDir::new().unwrap();
        assert!(create_static_router(temp_dir.path().to_str().unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_static_router_spa_fallback() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("index.html"), "<html>app</html>").unwrap();
        std::fs::create_dir(temp_dir.path().join("assets")).unwrap();
        std::fs::write(temp_dir.path().join("assets").join("app.js"), "console.log(1)").unwrap();

        let router = create_static_router(temp_dir.path().to_str().unwrap()).unwrap();

        let response = router
            .clone()
            .oneshot(Request::get("/some/client/route").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<html>app</html>");

        let response = router
            .oneshot(Request::get("/assets/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"console.log(1)");
    }
}
