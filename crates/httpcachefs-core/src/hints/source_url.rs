//! `FROM '<literal>'` source detection.
//!
//! A plain pattern match, independent of the SQL parser, so it also works
//! on text the parser rejects.

use once_cell::sync::Lazy;
use regex::Regex;

/// `FROM`, any case, then at least one whitespace character (newlines and
/// indentation included), then a non-empty single-quoted literal.
static FROM_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FROM\s+'([^']+)'").expect("FROM literal pattern is valid"));

pub(super) fn from_literal_pattern() -> &'static Regex {
    &FROM_LITERAL
}

/// Extract the single-quoted resource locator following the first `FROM`.
///
/// The literal is returned verbatim; validating it as a URL is up to the
/// caller.
///
/// ```
/// use httpcachefs_core::hints::extract_source_url;
///
/// let sql = "SELECT key\nFROM\n        'https://example.com/file.parquet'\nWHERE key = 1";
/// assert_eq!(
///     extract_source_url(sql).as_deref(),
///     Some("https://example.com/file.parquet")
/// );
/// assert_eq!(extract_source_url("SELECT * FROM t"), None);
/// ```
pub fn extract_source_url(sql: &str) -> Option<String> {
    FROM_LITERAL
        .captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_space() {
        assert_eq!(
            extract_source_url("SELECT * FROM 'https://example.com/file.parquet' WHERE k = 1")
                .as_deref(),
            Some("https://example.com/file.parquet")
        );
    }

    #[test]
    fn test_newline_and_indentation() {
        assert_eq!(
            extract_source_url("FROM\n    'https://x/y.parquet'").as_deref(),
            Some("https://x/y.parquet")
        );
    }

    #[test]
    fn test_multiple_spaces_and_tabs() {
        assert_eq!(
            extract_source_url("select * from \t  'https://x/z.parquet'").as_deref(),
            Some("https://x/z.parquet")
        );
    }

    #[test]
    fn test_case_insensitive_keyword() {
        assert_eq!(
            extract_source_url("SELECT 1 FrOm 'data.parquet'").as_deref(),
            Some("data.parquet")
        );
    }

    #[test]
    fn test_first_match_wins() {
        let sql = "SELECT * FROM 'a.parquet' UNION ALL SELECT * FROM 'b.parquet'";
        assert_eq!(extract_source_url(sql).as_deref(), Some("a.parquet"));
    }

    #[test]
    fn test_requires_whitespace_between_keyword_and_literal() {
        assert_eq!(extract_source_url("SELECT * FROM'a.parquet'"), None);
    }

    #[test]
    fn test_empty_literal_is_not_a_source() {
        assert_eq!(extract_source_url("SELECT * FROM ''"), None);
    }

    #[test]
    fn test_unquoted_table_is_not_a_source() {
        assert_eq!(extract_source_url("SELECT * FROM t WHERE k = 'x'"), None);
    }

    #[test]
    fn test_literal_returned_verbatim() {
        assert_eq!(
            extract_source_url("FROM 'https://h/p?a=1&b=%20c'").as_deref(),
            Some("https://h/p?a=1&b=%20c")
        );
    }
}
