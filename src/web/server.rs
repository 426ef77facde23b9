//! Web server for LocalShare.

use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::{start_session_cleanup_task, CLEANUP_INTERVAL_SECS};
use crate::config::Config;

use super::handlers::AppState;
use super::middleware::RateLimitState;
use super::router::{create_health_router, create_router, create_static_router};

/// Web server for the API and the optional frontend.
pub struct WebServer {
    /// Validated configuration.
    config: Config,
    /// Application state.
    app_state: Arc<AppState>,
    /// Credential throttling state.
    rate_limit_state: Arc<RateLimitState>,
}

impl WebServer {
    /// Create a new web server from a validated configuration.
    pub fn new(config: Config) -> Self {
        let app_state = Arc::new(AppState::new(&config));
        let rate_limit_state = Arc::new(RateLimitState::new(config.server.auth_rate_limit));

        Self {
            config,
            app_state,
            rate_limit_state,
        }
    }

    /// Application state shared with the handlers.
    pub fn app_state(&self) -> &Arc<AppState> {
        &self.app_state
    }

    fn build_router(&self) -> Router {
        let mut router = create_router(
            self.app_state.clone(),
            self.rate_limit_state.clone(),
            &self.config.server.cors_origins,
        )
        .merge(create_health_router());

        if self.config.server.serve_static {
            if let Some(static_router) = create_static_router(&self.config.server.static_path) {
                router = router.merge(static_router);
            }
        }

        router
    }

    fn start_background_tasks(&self) {
        start_session_cleanup_task(
            self.app_state.sessions.clone(),
            Duration::from_secs(CLEANUP_INTERVAL_SECS),
        );
        tracing::info!("Session cleanup task started (runs every hour)");

        self.rate_limit_state.clone().start_cleanup_task();
    }

    async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        TcpListener::bind((self.config.server.host.as_str(), self.config.server.port)).await
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.build_router();
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        self.start_background_tasks();
        self.log_banner(local_addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let router = self.build_router();
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;

        self.start_background_tasks();
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }

    fn log_banner(&self, local_addr: SocketAddr) {
        let port = local_addr.port();
        let auth = &self.config.auth;

        tracing::info!("LocalShare is running");
        tracing::info!("  Local:    http://localhost:{}", port);
        match lan_ip() {
            Some(ip) => tracing::info!("  Network:  http://{}:{}", ip, port),
            None => tracing::info!("  Network:  unavailable"),
        }
        tracing::info!(
            "  Directory: {}",
            self.app_state.store.root().display()
        );
        if self.config.is_pin_protected() {
            tracing::info!("  PIN:      enabled");
        } else {
            tracing::info!("  PIN:      disabled");
        }
        if self.config.is_admin_auth_enabled() {
            tracing::info!("  Admin:    enabled (user: {})", auth.admin_user);
        } else {
            tracing::info!("  Admin:    disabled");
        }
        tracing::info!("  Max size: {} MB", self.config.files.max_file_size_mb);
    }
}

/// Address of the interface that routes to the outside world.
///
/// Connecting a UDP socket selects a route without sending any packet.
fn lan_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
