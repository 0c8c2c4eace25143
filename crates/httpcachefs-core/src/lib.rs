//! httpcachefs Core - cache addressing and query hints
//!
//! This crate provides the pure building blocks of the query-over-remote-file
//! cache:
//! - Cache key derivation (resource and query scoped SHA256 digests)
//! - Query hint extraction (partition column, literal source URL)
//! - The canonical error facility shared with the store crate
//! - The structured logging facility

pub mod errors;
pub mod hints;
pub mod keys;
pub mod logging_facility;

// Re-export commonly used types
pub use errors::{CacheError, ExError, ExErrorKind, Result};
pub use hints::{extract_partition_column, extract_source_url, QueryHints};
pub use keys::{derive_query_key, derive_resource_key, CacheKey};
