//! httpcachefs Store - crash-safe artifact persistence
//!
//! Provides:
//! - Atomic write-or-don't persistence via staging file + rename
//! - Bounded retry with exponential backoff on transient lock contention
//! - Key-addressed artifact layout under a cache root
//! - Persist options loadable from TOML

pub mod errors;
pub mod layout;
pub mod options;
pub mod persist;

// Re-export key types
pub use errors::Result;
pub use options::PersistOptions;
pub use persist::{atomic_write, AtomicPersister, Payload, PersistFs, StdFs};
