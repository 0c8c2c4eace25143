//! Cache key derivation.
//!
//! Maps identifying strings to stable SHA256 digests used as cache
//! addresses. Both functions are pure: no state, no I/O.
//!
//! ## Key Types
//!
//! - **Resource key**: hash of a remote resource identifier (e.g. one URL)
//! - **Query key**: hash of a partition value plus the selected columns
//!
//! ## Determinism Guarantees
//!
//! - Same input → same key
//! - Column order is significant: reordering produces a different key
//! - Output is always 64 lowercase hex characters

use crate::errors::{CacheError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of every key in hex characters.
pub const KEY_HEX_LEN: usize = 64;

/// Separator between the partition value and the canonical column list.
const QUERY_KEY_SEPARATOR: char = '|';

/// Immutable hex digest addressing one cached artifact.
///
/// Deserialization rejects anything that is not 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CacheKey(String);

impl CacheKey {
    /// Parse a previously derived key, e.g. a directory name read back from disk.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidKey` unless `value` is 64 lowercase hex characters.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let well_formed = value.len() == KEY_HEX_LEN
            && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if well_formed {
            Ok(Self(value))
        } else {
            Err(CacheError::InvalidKey { value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First two hex characters, used as a shard directory name.
    pub fn shard(&self) -> &str {
        &self.0[..2]
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CacheKey {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the key addressing storage for one remote resource.
///
/// ## Example
///
/// ```
/// use httpcachefs_core::keys::derive_resource_key;
///
/// let key = derive_resource_key("https://example.com/file.parquet");
/// assert_eq!(key.as_str().len(), 64);
/// ```
pub fn derive_resource_key(identifier: &str) -> CacheKey {
    CacheKey(hash_string(identifier))
}

/// Derive the key for one query result.
///
/// Hashes `"{partition_value}|{columns}"` where `columns` is the compact
/// JSON array of column names in the order given, or `null` when no
/// column selection applies.
///
/// ## Errors
///
/// Returns `CacheError::Serialization` if the column list cannot be
/// serialized.
///
/// ## Example
///
/// ```
/// use httpcachefs_core::keys::derive_query_key;
///
/// let a = derive_query_key("VALUE_1", Some(&["key", "score"][..])).unwrap();
/// let b = derive_query_key("VALUE_1", Some(&["score", "key"][..])).unwrap();
/// assert_ne!(a, b);
/// ```
pub fn derive_query_key<S: AsRef<str>>(
    partition_value: &str,
    columns: Option<&[S]>,
) -> Result<CacheKey> {
    let columns: Option<Vec<&str>> =
        columns.map(|cols| cols.iter().map(AsRef::as_ref).collect());
    let canonical = serde_json::to_string(&columns)?;
    Ok(CacheKey(hash_string(&format!(
        "{}{}{}",
        partition_value, QUERY_KEY_SEPARATOR, canonical
    ))))
}

/// Hash a string using SHA256.
fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key_matches_sha256_of_identifier() {
        // sha256("abc")
        assert_eq!(
            derive_resource_key("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_query_key_canonical_form() {
        let expected = hash_string(r#"k1|["a","b"]"#);
        let key = derive_query_key("k1", Some(&["a", "b"][..])).unwrap();
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn test_query_key_absent_columns_marker() {
        let expected = hash_string("k1|null");
        let key = derive_query_key::<String>("k1", None).unwrap();
        assert_eq!(key.as_str(), expected);
    }

    #[test]
    fn test_absent_columns_differs_from_empty_list() {
        let none = derive_query_key::<&str>("k1", None).unwrap();
        let empty = derive_query_key::<&str>("k1", Some(&[][..])).unwrap();
        assert_ne!(none, empty);
    }

    #[test]
    fn test_shard_is_key_prefix() {
        let key = derive_resource_key("https://example.com/a.parquet");
        assert_eq!(key.shard().len(), 2);
        assert!(key.as_str().starts_with(key.shard()));
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let key = derive_resource_key("x");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key));
        let back: CacheKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(CacheKey::parse("abc").is_err());
        assert!(CacheKey::parse("G".repeat(KEY_HEX_LEN)).is_err());
        assert!(CacheKey::parse("A".repeat(KEY_HEX_LEN)).is_err());
        assert!(serde_json::from_str::<CacheKey>("\"nothex\"").is_err());

        let key = derive_resource_key("y");
        assert_eq!(CacheKey::parse(key.as_str()).unwrap(), key);
    }
}
