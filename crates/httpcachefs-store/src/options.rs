//! Persist options
//!
//! Built in code through the `with_*` methods or loaded from a TOML
//! fragment such as:
//!
//! ```toml
//! max_retries = 5
//! base_backoff_ms = 10
//! sync_data = true
//! ```

use crate::errors::{invalid_config, Result};
use serde::Deserialize;
use std::time::Duration;

/// Default number of commit attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff before the second attempt; doubles after each failure.
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 10;

/// Largest accepted `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 16;

/// Ceiling on any single backoff sleep.
pub const MAX_BACKOFF_MS: u64 = 10_000;

/// Options controlling one persister.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistOptions {
    /// Total commit attempts when failures are transient lock contention
    pub max_retries: u32,
    /// Backoff after the first failed attempt, in milliseconds
    pub base_backoff_ms: u64,
    /// fsync the staging file before the rename
    pub sync_data: bool,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
            sync_data: true,
        }
    }
}

impl PersistOptions {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_sync_data(mut self, sync_data: bool) -> Self {
        self.sync_data = sync_data;
        self
    }

    /// Parse options from TOML; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidConfig` on malformed TOML, unknown keys
    /// or values rejected by [`PersistOptions::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: Self = toml::from_str(source)
            .map_err(|e| invalid_config(format!("Invalid persist options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// # Errors
    ///
    /// Returns `CacheError::InvalidConfig` when `max_retries` is zero or
    /// above [`MAX_RETRIES_LIMIT`], or `base_backoff_ms` exceeds
    /// [`MAX_BACKOFF_MS`].
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(invalid_config("max_retries must be at least 1"));
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(invalid_config(format!(
                "max_retries must be at most {}, got {}",
                MAX_RETRIES_LIMIT, self.max_retries
            )));
        }
        if self.base_backoff_ms > MAX_BACKOFF_MS {
            return Err(invalid_config(format!(
                "base_backoff_ms must be at most {}, got {}",
                MAX_BACKOFF_MS, self.base_backoff_ms
            )));
        }
        Ok(())
    }

    /// Backoff after failed attempt `attempt` (0-based): `base * 2^attempt`,
    /// capped at [`MAX_BACKOFF_MS`].
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let millis = self.base_backoff_ms.saturating_mul(factor).min(MAX_BACKOFF_MS);
        Duration::from_millis(millis)
    }

    /// Sum of every backoff a fully exhausted persist sleeps through.
    pub fn worst_case_backoff(&self) -> Duration {
        (0..self.max_retries)
            .map(|attempt| self.backoff_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}
