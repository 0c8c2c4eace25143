// Integration tests for query hint extraction
// Covers the literal extraction cases and parse-failure normalisation

use httpcachefs_core::hints::{extract_partition_column, extract_source_url, QueryHints};

#[test]
fn test_equality_on_bare_column() {
    assert_eq!(
        extract_partition_column("SELECT * FROM t WHERE uuid = '123'").as_deref(),
        Some("uuid")
    );
}

#[test]
fn test_first_match_unqualified() {
    assert_eq!(
        extract_partition_column("SELECT * FROM t WHERE t.id = 1 AND status = 2").as_deref(),
        Some("id")
    );
}

#[test]
fn test_membership_predicate() {
    assert_eq!(
        extract_partition_column("SELECT * FROM t WHERE id IN (1,2,3)").as_deref(),
        Some("id")
    );
}

#[test]
fn test_function_subject_is_absent() {
    assert_eq!(
        extract_partition_column("SELECT * FROM t WHERE LOWER(name) = 'x'"),
        None
    );
}

#[test]
fn test_source_url_inline() {
    assert_eq!(
        extract_source_url("SELECT * FROM 'https://example.com/file.parquet' WHERE k = 1")
            .as_deref(),
        Some("https://example.com/file.parquet")
    );
}

#[test]
fn test_source_url_after_newline_and_indentation() {
    assert_eq!(
        extract_source_url("FROM\n    'https://x/y.parquet'").as_deref(),
        Some("https://x/y.parquet")
    );
}

#[test]
fn test_malformed_sql_yields_nothing() {
    let sql = "SELEC * FRM";
    assert_eq!(extract_partition_column(sql), None);
    assert_eq!(extract_source_url(sql), None);
}

#[test]
fn test_hostile_inputs_never_panic() {
    let inputs = [
        "",
        "'",
        "FROM '",
        "SELECT * FROM t WHERE",
        "SELECT * FROM t WHERE (((((",
        "SELECT * FROM 'unterminated WHERE id = 1",
        "\u{0}\u{1}\u{2}",
        "SELECT * FROM t WHERE id IN ()",
    ];
    for sql in inputs {
        let _ = QueryHints::from_sql(sql);
    }
}

#[test]
fn test_remote_file_query() {
    let url = "https://example.com/file.parquet";
    let sql = format!(
        "\nSELECT key, score\nFROM '{url}'\nWHERE key IN ('VALUE_1', 'VALUE_2')\nAND score > 100\n"
    );

    let hints = QueryHints::from_sql(&sql);

    assert_eq!(hints.partition_column.as_deref(), Some("key"));
    assert_eq!(hints.source_url.as_deref(), Some(url));
}

#[test]
fn test_extraction_is_referentially_transparent() {
    let sql = "SELECT * FROM 'a.parquet' WHERE region = 'eu'";
    assert_eq!(QueryHints::from_sql(sql), QueryHints::from_sql(sql));
}

#[test]
fn test_predicates_nested_anywhere_below_where() {
    let cases = [
        ("SELECT * FROM t WHERE EXISTS (SELECT 1 FROM u WHERE u.id = 5)", "id"),
        ("SELECT * FROM t WHERE x > (SELECT max(v) FROM u WHERE k = 1)", "k"),
        ("SELECT * FROM t WHERE CASE WHEN region = 'eu' THEN true ELSE false END", "region"),
        ("SELECT * FROM t WHERE COALESCE(flag = 1, false)", "flag"),
        ("SELECT * FROM t WHERE CAST(id = 1 AS BOOLEAN)", "id"),
        ("SELECT (SELECT max(v) FROM u WHERE k = 1) FROM t", "k"),
    ];
    for (sql, expected) in cases {
        assert_eq!(
            extract_partition_column(sql).as_deref(),
            Some(expected),
            "query: {sql}"
        );
    }
}
