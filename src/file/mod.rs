//! Shared directory operations for LocalShare.
//!
//! This module provides:
//! - Filename sanitization for client-supplied names
//! - A flat file store (list, resolve, exists, delete)
//! - A streaming upload writer with a hard size cap

mod sanitize;
mod store;
mod upload;

pub use sanitize::sanitize;
pub use store::{FileInfo, FileStore};
pub use upload::upload;
