use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use localshare::cli::Cli;
use localshare::{FileStore, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = localshare::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        localshare::logging::init_console_only(&config.logging.level);
    }

    let store = FileStore::new(&config.files.upload_dir);
    if let Err(e) = store.ensure_root().await {
        error!(dir = %config.files.upload_dir, error = %e, "Failed to create upload directory");
        return ExitCode::FAILURE;
    }

    info!("LocalShare v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = WebServer::new(config).run().await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
