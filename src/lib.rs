//! LocalShare - file sharing for the local network
//!
//! Serves one directory over HTTP so devices on the same network can list,
//! download, upload and delete files. Browsing can be gated behind a PIN and
//! modifications behind an admin login.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{AccessPolicy, GateError, SessionError, SessionFlags, SessionStore};
pub use config::Config;
pub use error::{Result, ShareError};
pub use file::{FileInfo, FileStore};
pub use web::WebServer;
