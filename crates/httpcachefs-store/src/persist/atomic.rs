//! Atomic write primitives
//!
//! Uses staging→rename so a target holds either its previous complete
//! contents or the new complete contents, never a partial write. The rename
//! is the only step that touches the target's name, which keeps the
//! guarantee even if the process dies between staging and commit.

use crate::errors::{create_dir_error, invalid_target, persist_failed, Result};
use crate::layout::staging_path;
use crate::options::PersistOptions;
use crate::persist::contention::is_transient_contention;
use crate::persist::fs::{PersistFs, StdFs};
use httpcachefs_core::logging_facility::elapsed_ms;
use httpcachefs_core::{log_op_end, log_op_error, log_op_start};
use std::io;
use std::path::Path;
use std::thread;
use std::time::Instant;

/// Content handed to the persister for the duration of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Payload<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    fn kind(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Bytes(_) => "bytes",
        }
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(text)
    }
}

impl<'a> From<&'a String> for Payload<'a> {
    fn from(text: &'a String) -> Self {
        Payload::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Payload<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Payload<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

/// Write-or-don't persister with bounded retry on lock contention.
///
/// Holds no state between calls. Concurrent calls on the same target are
/// last-writer-wins; callers needing more must serialize externally.
#[derive(Debug, Clone, Default)]
pub struct AtomicPersister<F = StdFs> {
    fs: F,
    options: PersistOptions,
}

impl AtomicPersister<StdFs> {
    /// Create a persister on the real filesystem
    pub fn new(options: PersistOptions) -> Self {
        Self::with_fs(StdFs, options)
    }
}

impl<F: PersistFs> AtomicPersister<F> {
    /// Create a persister on a custom filesystem implementation
    pub fn with_fs(fs: F, options: PersistOptions) -> Self {
        Self { fs, options }
    }

    pub fn options(&self) -> &PersistOptions {
        &self.options
    }

    /// Durably replace `target_path`'s contents with `payload`, or leave it
    /// untouched.
    ///
    /// - Creates missing parent directories (not retried)
    /// - Reclaims a staging file left behind by a crashed attempt
    /// - Retries staging write + rename up to `max_retries` times in total
    ///   while failures look like transient lock contention, sleeping
    ///   `base_backoff * 2^attempt` after each
    ///
    /// # Errors
    ///
    /// - `CacheError::InvalidConfig` if the options are invalid
    /// - `CacheError::InvalidTarget` if the path has no file name
    /// - `CacheError::CreateDir` if the parent directory cannot be created
    /// - `CacheError::PersistFailed` with the last I/O error once attempts
    ///   are exhausted or a non-transient error occurs
    pub fn persist<'a>(&self, target_path: &Path, payload: impl Into<Payload<'a>>) -> Result<()> {
        let payload = payload.into();
        let start = Instant::now();
        log_op_start!(
            "persist",
            path = %target_path.display(),
            payload = payload.kind(),
            len = payload.len() as u64
        );

        match self.persist_inner(target_path, payload) {
            Ok(attempts) => {
                log_op_end!(
                    "persist",
                    duration_ms = elapsed_ms(start),
                    path = %target_path.display(),
                    attempts = attempts
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    "persist",
                    &err,
                    duration_ms = elapsed_ms(start),
                    path = %target_path.display()
                );
                Err(err)
            }
        }
    }

    /// Persist UTF-8 text
    ///
    /// # Errors
    ///
    /// See [`AtomicPersister::persist`].
    pub fn persist_text(&self, target_path: &Path, text: &str) -> Result<()> {
        self.persist(target_path, Payload::Text(text))
    }

    /// Persist an opaque byte blob
    ///
    /// # Errors
    ///
    /// See [`AtomicPersister::persist`].
    pub fn persist_bytes(&self, target_path: &Path, bytes: &[u8]) -> Result<()> {
        self.persist(target_path, Payload::Bytes(bytes))
    }

    /// Returns the number of attempts the successful commit took.
    fn persist_inner(&self, target_path: &Path, payload: Payload<'_>) -> Result<u32> {
        self.options.validate()?;
        if target_path.file_name().is_none() {
            return Err(invalid_target(target_path, "path has no file name"));
        }

        if let Some(parent) = target_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| create_dir_error(parent, e))?;
        }

        let staging = staging_path(target_path);
        self.discard_staging(&staging);

        let max_attempts = self.options.max_retries;
        let mut attempt: u32 = 0;
        loop {
            let err = match self.commit(&staging, target_path, payload.as_bytes()) {
                Ok(()) => return Ok(attempt + 1),
                Err(err) => err,
            };

            let attempts_made = attempt + 1;
            let transient = is_transient_contention(&err);
            if transient {
                let backoff = self.options.backoff_for(attempt);
                tracing::debug!(
                    op = "persist",
                    event = httpcachefs_core_types::schema::EVENT_RETRY,
                    path = %target_path.display(),
                    attempt = attempts_made,
                    max_retries = max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "file lock conflict"
                );
                thread::sleep(backoff);
            }

            if !transient || attempts_made >= max_attempts {
                self.discard_staging(&staging);
                return Err(persist_failed(target_path, attempts_made, transient, err));
            }
            attempt += 1;
        }
    }

    /// Steps that are retried: stage the full payload, then swap it in.
    fn commit(&self, staging: &Path, target_path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.fs.write_file(staging, bytes, self.options.sync_data)?;
        self.fs.rename(staging, target_path)
    }

    /// Best-effort removal of a leftover staging file; failures are logged
    /// and otherwise ignored.
    fn discard_staging(&self, staging: &Path) {
        if !self.fs.exists(staging) {
            return;
        }
        if let Err(err) = self.fs.remove_file(staging) {
            tracing::warn!(
                op = "persist",
                path = %staging.display(),
                error = %err,
                "could not remove staging file"
            );
        }
    }
}

/// Atomically write `payload` to `target_path` with default options
///
/// # Errors
///
/// See [`AtomicPersister::persist`].
pub fn atomic_write<'a>(target_path: &Path, payload: impl Into<Payload<'a>>) -> Result<()> {
    AtomicPersister::new(PersistOptions::default()).persist(target_path, payload)
}
