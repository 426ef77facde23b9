//! API handlers for LocalShare.

pub mod auth;
pub mod config;
pub mod file;

pub use auth::*;
pub use config::*;
pub use file::*;

use std::sync::Arc;

use crate::auth::{AccessPolicy, SessionStore};
use crate::config::{AuthConfig, Config};
use crate::file::FileStore;

/// Shared state for all handlers.
pub struct AppState {
    /// Shared directory.
    pub store: FileStore,
    /// Session store.
    pub sessions: Arc<SessionStore>,
    /// Checks enforced on file routes.
    pub policy: AccessPolicy,
    /// Configured credentials.
    pub auth: AuthConfig,
    /// Upload limit in bytes.
    pub max_file_size: u64,
}

impl AppState {
    /// Create application state from a validated configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_sessions(config, Arc::new(SessionStore::new()))
    }

    /// Create application state with an existing session store.
    pub fn with_sessions(config: &Config, sessions: Arc<SessionStore>) -> Self {
        Self {
            store: FileStore::new(&config.files.upload_dir),
            sessions,
            policy: AccessPolicy {
                pin_protected: config.is_pin_protected(),
                admin_required: config.is_admin_auth_enabled(),
            },
            auth: config.auth.clone(),
            max_file_size: config.max_file_size_bytes(),
        }
    }
}
