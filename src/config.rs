//! Configuration module for LocalShare.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables, then command-line flags. It is validated once
//! after all layers are applied and never changes afterwards.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShareError};

/// Number of bytes in one megabyte as used for upload limits.
const BYTES_PER_MB: u64 = 1024 * 1024;

/// Upper bound for the configured upload size, in megabytes.
pub const MAX_FILE_SIZE_MB_LIMIT: u64 = 10_000;

/// Minimum length of the admin password.
pub const MIN_ADMIN_PASS_LEN: usize = 6;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the web frontend.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to the built frontend (contains `index.html` and `assets/`).
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Credential attempts allowed per client IP per minute.
    #[serde(default = "default_auth_rate_limit")]
    pub auth_rate_limit: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_path() -> String {
    "dist".to_string()
}

fn default_auth_rate_limit() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
            auth_rate_limit: default_auth_rate_limit(),
        }
    }
}

/// Shared directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Directory holding the shared files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u64,
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u64 {
    500
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_file_size_mb: default_max_file_size(),
        }
    }
}

/// Access control configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// PIN required to browse files. Empty disables PIN protection.
    #[serde(default)]
    pub pin: String,
    /// Whether uploads and deletes require an admin login.
    #[serde(default)]
    pub admin_enabled: bool,
    /// Admin username.
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
    /// Admin password (required when admin is enabled).
    #[serde(default)]
    pub admin_pass: String,
}

fn default_admin_user() -> String {
    "admin".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pin: String::new(),
            admin_enabled: false,
            admin_user: default_admin_user(),
            admin_pass: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to the console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared directory configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Access control configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShareError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ShareError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `LOCALSHARE_PIN`: Override the access PIN
    /// - `LOCALSHARE_ADMIN_PASS`: Override the admin password
    pub fn apply_env_overrides(&mut self) {
        if let Ok(pin) = std::env::var("LOCALSHARE_PIN") {
            if !pin.is_empty() {
                self.auth.pin = pin;
            }
        }
        if let Ok(pass) = std::env::var("LOCALSHARE_ADMIN_PASS") {
            if !pass.is_empty() {
                self.auth.admin_pass = pass;
            }
        }
    }

    /// Maximum upload size in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.files.max_file_size_mb * BYTES_PER_MB
    }

    /// Whether a PIN is required to browse files.
    pub fn is_pin_protected(&self) -> bool {
        !self.auth.pin.is_empty()
    }

    /// Whether uploads and deletes require an admin login.
    pub fn is_admin_auth_enabled(&self) -> bool {
        self.auth.admin_enabled
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ShareError::Config(
                "port must be between 1 and 65535, got 0".to_string(),
            ));
        }

        if self.is_pin_protected() && !is_valid_pin(&self.auth.pin) {
            return Err(ShareError::Config("PIN must be 4-6 digits".to_string()));
        }

        if self.auth.admin_enabled {
            if self.auth.admin_pass.is_empty() {
                return Err(ShareError::Config(
                    "admin password is required when admin authentication is enabled \
                     (use --admin-pass)"
                        .to_string(),
                ));
            }
            if self.auth.admin_pass.chars().count() < MIN_ADMIN_PASS_LEN {
                return Err(ShareError::Config(format!(
                    "admin password must be at least {MIN_ADMIN_PASS_LEN} characters"
                )));
            }
        }

        if self.files.max_file_size_mb < 1 {
            return Err(ShareError::Config(
                "max file size must be at least 1 MB".to_string(),
            ));
        }
        if self.files.max_file_size_mb > MAX_FILE_SIZE_MB_LIMIT {
            return Err(ShareError::Config(format!(
                "max file size cannot exceed {MAX_FILE_SIZE_MB_LIMIT} MB (10 GB)"
            )));
        }

        Ok(())
    }
}

/// A PIN is 4 to 6 ASCII digits.
fn is_valid_pin(pin: &str) -> bool {
    (4..=6).contains(&pin.len()) && pin.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors_origins.is_empty());
        assert!(!config.server.serve_static);
        assert_eq!(config.server.static_path, "dist");
        assert_eq!(config.server.auth_rate_limit, 10);

        assert_eq!(config.files.upload_dir, "./uploads");
        assert_eq!(config.files.max_file_size_mb, 500);

        assert!(config.auth.pin.is_empty());
        assert!(!config.auth.admin_enabled);
        assert_eq!(config.auth.admin_user, "admin");
        assert!(config.auth.admin_pass.is_empty());

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_empty());

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:5173"]
serve_static = true
static_path = "web/dist"
auth_rate_limit = 20

[files]
upload_dir = "/srv/share"
max_file_size_mb = 100

[auth]
pin = "4321"
admin_enabled = true
admin_user = "root"
admin_pass = "secret123"

[logging]
level = "debug"
file = "logs/localshare.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert!(config.server.serve_static);
        assert_eq!(config.server.static_path, "web/dist");
        assert_eq!(config.server.auth_rate_limit, 20);

        assert_eq!(config.files.upload_dir, "/srv/share");
        assert_eq!(config.files.max_file_size_mb, 100);

        assert_eq!(config.auth.pin, "4321");
        assert!(config.auth.admin_enabled);
        assert_eq!(config.auth.admin_user, "root");
        assert_eq!(config.auth.admin_pass, "secret123");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "logs/localshare.log");

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[files]
max_file_size_mb = 5
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.files.max_file_size_mb, 5);
        assert_eq!(config.files.upload_dir, "./uploads");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.admin_user, "admin");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(ShareError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent-localshare.toml");
        assert!(matches!(result, Err(ShareError::Io(_))));
    }

    #[test]
    fn test_max_file_size_bytes() {
        let mut config = Config::default();
        config.files.max_file_size_mb = 1;
        assert_eq!(config.max_file_size_bytes(), 1_048_576);

        config.files.max_file_size_mb = 500;
        assert_eq!(config.max_file_size_bytes(), 500 * 1_048_576);
    }

    #[test]
    fn test_protection_flags() {
        let mut config = Config::default();
        assert!(!config.is_pin_protected());
        assert!(!config.is_admin_auth_enabled());

        config.auth.pin = "1234".to_string();
        config.auth.admin_enabled = true;
        assert!(config.is_pin_protected());
        assert!(config.is_admin_auth_enabled());
    }

    #[test]
    fn test_validate_pin_format() {
        let mut config = Config::default();

        for pin in ["1234", "12345", "123456"] {
            config.auth.pin = pin.to_string();
            assert!(config.validate().is_ok(), "pin {pin} should be valid");
        }

        for pin in ["123", "1234567", "12a4", " 1234", "１２３４"] {
            config.auth.pin = pin.to_string();
            let result = config.validate();
            assert!(result.is_err(), "pin {pin:?} should be rejected");
        }
    }

    #[test]
    fn test_validate_admin_requires_password() {
        let mut config = Config::default();
        config.auth.admin_enabled = true;

        let result = config.validate();
        if let Err(ShareError::Config(msg)) = result {
            assert!(msg.contains("admin password is required"));
        } else {
            panic!("Expected Config error");
        }

        config.auth.admin_pass = "short".to_string();
        let result = config.validate();
        if let Err(ShareError::Config(msg)) = result {
            assert!(msg.contains("at least 6 characters"));
        } else {
            panic!("Expected Config error");
        }

        config.auth.admin_pass = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_admin_disabled_ignores_password() {
        let mut config = Config::default();
        config.auth.admin_pass = "x".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config.server.port = 1;
        assert!(config.validate().is_ok());

        config.server.port = 65535;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_file_size_bounds() {
        let mut config = Config::default();

        config.files.max_file_size_mb = 0;
        assert!(config.validate().is_err());

        config.files.max_file_size_mb = 1;
        assert!(config.validate().is_ok());

        config.files.max_file_size_mb = 10_000;
        assert!(config.validate().is_ok());

        config.files.max_file_size_mb = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_env_overrides() {
        let original_pin = std::env::var("LOCALSHARE_PIN").ok();
        let original_pass = std::env::var("LOCALSHARE_ADMIN_PASS").ok();

        std::env::set_var("LOCALSHARE_PIN", "9876");
        std::env::set_var("LOCALSHARE_ADMIN_PASS", "");

        let mut config = Config::default();
        config.auth.admin_pass = "from-file".to_string();
        config.apply_env_overrides();

        assert_eq!(config.auth.pin, "9876");
        // Empty values never override
        assert_eq!(config.auth.admin_pass, "from-file");

        match original_pin {
            Some(val) => std::env::set_var("LOCALSHARE_PIN", val),
            None => std::env::remove_var("LOCALSHARE_PIN"),
        }
        match original_pass {
            Some(val) => std::env::set_var("LOCALSHARE_ADMIN_PASS", val),
            None => std::env::remove_var("LOCALSHARE_ADMIN_PASS"),
        }
    }
}
