//! Command-line interface.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::Config;
use crate::Result;

/// Config file read when `--config` is not given, if present.
pub const DEFAULT_CONFIG_FILE: &str = "localshare.toml";

/// LocalShare - share files with devices on your local network.
#[derive(Parser, Debug, Default)]
#[command(name = "localshare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to share
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<String>,

    /// PIN required to browse files (4-6 digits)
    #[arg(long)]
    pub pin: Option<String>,

    /// Require admin login for uploads and deletes
    #[arg(long)]
    pub admin: bool,

    /// Admin username
    #[arg(long, value_name = "USER")]
    pub admin_user: Option<String>,

    /// Admin password
    #[arg(long, value_name = "PASS")]
    pub admin_pass: Option<String>,

    /// Maximum upload size in megabytes
    #[arg(long, value_name = "MB")]
    pub max_size: Option<u64>,
}

impl Cli {
    /// Build the effective configuration.
    ///
    /// Layers, lowest first: defaults, the config file, environment
    /// variables, command-line flags. The result is validated.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Config::load(DEFAULT_CONFIG_FILE)?,
            None => Config::default(),
        };

        config.apply_env_overrides();
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.dir {
            config.files.upload_dir = dir.clone();
        }
        if let Some(pin) = &self.pin {
            config.auth.pin = pin.clone();
        }
        if self.admin {
            config.auth.admin_enabled = true;
        }
        if let Some(user) = &self.admin_user {
            config.auth.admin_user = user.clone();
        }
        if let Some(pass) = &self.admin_pass {
            config.auth.admin_pass = pass.clone();
        }
        if let Some(max_size) = self.max_size {
            config.files.max_file_size_mb = max_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShareError;
    use tempfile::TempDir;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "localshare",
            "-p",
            "9000",
            "-d",
            "/srv/share",
            "--pin",
            "4321",
            "--admin",
            "--admin-user",
            "boss",
            "--admin-pass",
            "hunter22",
            "--max-size",
            "50",
        ]);

        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.dir.as_deref(), Some("/srv/share"));
        assert_eq!(cli.pin.as_deref(), Some("4321"));
        assert!(cli.admin);
        assert_eq!(cli.admin_user.as_deref(), Some("boss"));
        assert_eq!(cli.admin_pass.as_deref(), Some("hunter22"));
        assert_eq!(cli.max_size, Some(50));
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::parse_from(["localshare"]);
        let mut config = Config::default();
        config.server.port = 7000;
        cli.apply(&mut config);

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.files.upload_dir, "./uploads");
        assert!(!config.auth.admin_enabled);
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 7000\n\n[files]\nupload_dir = \"/from/file\"\nmax_file_size_mb = 10\n",
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            port: Some(9000),
            ..Default::default()
        };
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.files.upload_dir, "/from/file");
        assert_eq!(config.files.max_file_size_mb, 10);
    }

    #[test]
    fn test_invalid_pin_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let cli = Cli {
            config: Some(path),
            pin: Some("12ab".to_string()),
            ..Default::default()
        };
        assert!(matches!(cli.resolve_config(), Err(ShareError::Config(_))));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/localshare.toml")),
            ..Default::default()
        };
        assert!(cli.resolve_config().is_err());
    }
}
