//! On-disk naming for persisted artifacts
//!
//! Artifacts are addressed by cache key and sharded into subdirectories
//! named after the first 2 hex characters of the key, so a single directory
//! never accumulates every artifact. Staging files sit next to their target
//! with a reserved suffix.

use httpcachefs_core::keys::CacheKey;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Reserved suffix marking a staging file; never a valid artifact.
pub const STAGING_SUFFIX: &str = ".tmp";

/// Compute the staging path for a target.
///
/// The suffix is appended to the full file name, so `a.json` and
/// `a.parquet` in one directory stage to different files.
///
/// For target "<dir>/a.parquet", returns "<dir>/a.parquet.tmp"
pub fn staging_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(STAGING_SUFFIX);
    target.with_file_name(name)
}

/// True if `path` names a staging file.
pub fn is_staging_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(STAGING_SUFFIX))
}

/// Directory holding everything cached for one remote resource.
///
/// For key "abc123...", returns "<root>/abc123..."
pub fn resource_dir(root: &Path, resource_key: &CacheKey) -> PathBuf {
    root.join(resource_key.as_str())
}

/// Compute the sharded path for an artifact.
///
/// For key "abc123...", returns "<root>/ab/abc123....<ext>"
pub fn artifact_path(root: &Path, key: &CacheKey, extension: &str) -> PathBuf {
    root.join(key.shard())
        .join(format!("{}.{}", key.as_str(), extension))
}
