use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using CacheError
pub type Result<T> = std::result::Result<T, CacheError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    InvalidConfig,

    // Filesystem
    /// Non-retryable filesystem failure
    Io,
    /// Target or staging file held by another process; retries exhausted
    Contention,

    // Encoding
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Contention => "ERR_CONTENTION",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the
/// context needed for a useful log line.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    attempts: Option<u32>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            attempts: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add the number of attempts made before giving up
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(attempts) = self.attempts {
            write!(f, " (attempts: {})", attempts)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by key derivation and persistence
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error(
        "Failed to persist {} after {attempts} attempt(s): {source}",
        path.display()
    )]
    PersistFailed {
        path: PathBuf,
        attempts: u32,
        /// Whether the last failure looked like external lock contention
        transient: bool,
        source: io::Error,
    },

    #[error("Invalid persist target {}: {reason}", path.display())]
    InvalidTarget { path: PathBuf, reason: String },

    #[error("Malformed cache key '{value}': expected 64 lowercase hex characters")]
    InvalidKey { value: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl CacheError {
    /// Get the canonical kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            CacheError::CreateDir { .. } => ExErrorKind::Io,
            CacheError::PersistFailed { transient: true, .. } => ExErrorKind::Contention,
            CacheError::PersistFailed { .. } => ExErrorKind::Io,
            CacheError::InvalidTarget { .. } | CacheError::InvalidKey { .. } => {
                ExErrorKind::InvalidInput
            }
            CacheError::Serialization { .. } => ExErrorKind::Serialization,
            CacheError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
        }
    }

    /// True when the final failure was classified as transient contention
    pub fn is_transient(&self) -> bool {
        matches!(self, CacheError::PersistFailed { transient: true, .. })
    }

    /// The filesystem path involved, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            CacheError::CreateDir { path, .. }
            | CacheError::PersistFailed { path, .. }
            | CacheError::InvalidTarget { path, .. } => Some(path),
            CacheError::InvalidKey { .. }
            | CacheError::Serialization { .. }
            | CacheError::InvalidConfig { .. } => None,
        }
    }

    /// The underlying OS error, if any
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            CacheError::CreateDir { source, .. } | CacheError::PersistFailed { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Conversion from CacheError to ExError
impl From<&CacheError> for ExError {
    fn from(err: &CacheError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            CacheError::CreateDir { path, .. } => ex.with_op("create_dir").with_path(path),
            CacheError::PersistFailed { path, attempts, .. } => ex
                .with_op("persist")
                .with_path(path)
                .with_attempts(*attempts),
            CacheError::InvalidTarget { path, .. } => ex.with_op("persist").with_path(path),
            CacheError::InvalidKey { .. } => ex.with_op("parse_key"),
            CacheError::Serialization { .. } => ex.with_op("derive_key"),
            CacheError::InvalidConfig { .. } => ex.with_op("load_options"),
        }
    }
}

impl From<CacheError> for ExError {
    fn from(err: CacheError) -> Self {
        ExError::from(&err)
    }
}

/// Conversion from serde_json::Error to CacheError
impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization {
            message: err.to_string(),
        }
    }
}
