//! Query pruning hints.
//!
//! Best-effort inspection of SQL text before it is dispatched, recovering:
//!
//! - the column a WHERE clause filters on (equality or IN predicate), so a
//!   reader can skip row groups that cannot match
//! - the remote resource named by a `FROM '<url>'` clause
//!
//! Both extractors are total: any failure to recognise a hint yields `None`.

mod partition;
mod source_url;

pub use partition::extract_partition_column;
pub use source_url::extract_source_url;

/// Every hint recoverable from one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryHints {
    pub partition_column: Option<String>,
    pub source_url: Option<String>,
}

impl QueryHints {
    /// Run both extractors over `sql`.
    ///
    /// ```
    /// use httpcachefs_core::hints::QueryHints;
    ///
    /// let hints = QueryHints::from_sql(
    ///     "SELECT key, score FROM 'https://example.com/file.parquet' WHERE key IN ('a', 'b')",
    /// );
    /// assert_eq!(hints.partition_column.as_deref(), Some("key"));
    /// assert_eq!(hints.source_url.as_deref(), Some("https://example.com/file.parquet"));
    /// ```
    pub fn from_sql(sql: &str) -> Self {
        Self {
            partition_column: extract_partition_column(sql),
            source_url: extract_source_url(sql),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.partition_column.is_none() && self.source_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_are_independent() {
        let hints = QueryHints::from_sql("SELECT * FROM t WHERE uuid = '123'");
        assert_eq!(hints.partition_column.as_deref(), Some("uuid"));
        assert_eq!(hints.source_url, None);
        assert!(!hints.is_empty());
    }

    #[test]
    fn test_malformed_sql_yields_no_hints() {
        let hints = QueryHints::from_sql("SELEC * FRM");
        assert!(hints.is_empty());
        assert_eq!(hints, QueryHints::default());
    }
}
