//! Error handling for httpcachefs-store
//!
//! Wraps httpcachefs-core CacheError with store-specific helpers

use httpcachefs_core::errors::CacheError;
use std::io;
use std::path::Path;

/// Result type alias using CacheError
pub type Result<T> = std::result::Result<T, CacheError>;

/// Create a directory-creation error
pub fn create_dir_error(path: &Path, err: io::Error) -> CacheError {
    CacheError::CreateDir {
        path: path.to_path_buf(),
        source: err,
    }
}

/// Create the error surfaced when a persist gives up
pub fn persist_failed(path: &Path, attempts: u32, transient: bool, err: io::Error) -> CacheError {
    CacheError::PersistFailed {
        path: path.to_path_buf(),
        attempts,
        transient,
        source: err,
    }
}

/// Create an invalid-target error
pub fn invalid_target(path: &Path, reason: &str) -> CacheError {
    CacheError::InvalidTarget {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Create an invalid-configuration error
pub fn invalid_config(reason: impl Into<String>) -> CacheError {
    CacheError::InvalidConfig {
        reason: reason.into(),
    }
}
