//! Atomic persistence
//!
//! Provides:
//! - Write-or-don't replacement of a target file via staging + rename
//! - Transient lock contention detection
//! - A filesystem seam for failure injection

mod atomic;
mod contention;
mod fs;

pub use atomic::{atomic_write, AtomicPersister, Payload};
pub use contention::is_transient_contention;
pub use fs::{PersistFs, StdFs};
