//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields consistent between the persister,
//! the hint extractors and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Persistence context
pub const FIELD_PATH: &str = "path";
pub const FIELD_ATTEMPT: &str = "attempt";
pub const FIELD_ATTEMPTS: &str = "attempts";
pub const FIELD_MAX_RETRIES: &str = "max_retries";
pub const FIELD_BACKOFF_MS: &str = "backoff_ms";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_RETRY: &str = "retry";
