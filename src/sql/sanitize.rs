//! SQL Identifier Sanitization Utilities
//!
//! Provides functions to safely normalize, derive, and quote SQL identifiers so that
//! operator-supplied column names and generated table names can be interpolated into
//! DDL/DML without permitting injection.

use regex::Regex;

/// Fixed prefix for generated per-dataset table names
pub const TABLE_NAME_PREFIX: &str = "dataset_";

/// Length of the dataset-id derived suffix in generated table names
const TABLE_SUFFIX_LEN: usize = 16;

/// Maximum byte length of a column name before validation
const MAX_COLUMN_BYTES: usize = 255;

/// Quote a SQL identifier to make it safe for use in queries
///
/// Identifiers cannot be supplied as bound parameters, so every runtime-discovered
/// table or column name goes through this instead.
///
/// # Example
/// ```
/// use dataset_query_store::sql::quote_identifier;
///
/// let quoted = quote_identifier("my_column");
/// assert_eq!(quoted, "\"my_column\"");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    // Escape any double quotes in the identifier by doubling them
    let escaped = identifier.replace('"', "\"\"");
    format!("\"{}\"", escaped)
}

/// Normalize an operator-supplied column name
///
/// Steps, in order:
/// 1. Trim surrounding whitespace.
/// 2. Strip characters disallowed even inside the accepted charset
///    (angle brackets, quotes, backticks, semicolons, backslash).
/// 3. Truncate to 255 bytes on a char boundary.
/// 4. Validate against the restricted charset: word characters, underscore,
///    whitespace, and CJK unified ideographs, at most 100 characters.
///
/// # Returns
/// The normalized name, or a message naming the offending input
///
/// # Example
/// ```
/// use dataset_query_store::sql::normalize_column_name;
///
/// assert_eq!(normalize_column_name("name").unwrap(), "name");
/// assert_eq!(normalize_column_name(" 姓名 ").unwrap(), "姓名");
/// assert!(normalize_column_name("price(usd)").is_err());
/// ```
pub fn normalize_column_name(raw: &str) -> Result<String, String> {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '\'' | '"' | '`' | ';' | '\\'))
        .collect();
    let name = truncate_to_boundary(&stripped, MAX_COLUMN_BYTES);

    if name.is_empty() {
        return Err(format!("Column name '{}' is empty after sanitization", raw));
    }

    let re = Regex::new(r"^[\u{4e00}-\u{9fa5}a-zA-Z0-9_\s]{1,100}$").unwrap();
    if !re.is_match(name) {
        return Err(format!(
            "Column name '{}' is invalid. Only letters, numbers, underscores, whitespace, and CJK characters are allowed (at most 100 characters).",
            raw
        ));
    }

    Ok(name.to_string())
}

/// Derive a per-dataset table name from a dataset identifier
///
/// Produces `dataset_` followed by a hyphen-free, charset-filtered encoding of the
/// identifier truncated to a bounded length, so the generated-name invariant holds
/// by construction rather than by validation.
pub fn derive_table_name(dataset_id: &str) -> String {
    let suffix: String = dataset_id
        .chars()
        .map(|c| if c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(TABLE_SUFFIX_LEN)
        .collect();
    format!("{}{}", TABLE_NAME_PREFIX, suffix)
}

/// Check that a table name matches the generated-name invariant
///
/// Used as defense in depth before destructive statements: a metadata row whose
/// table name does not match the pattern is never dropped.
pub fn is_valid_table_name(table_name: &str) -> bool {
    let re = Regex::new(r"^dataset_[a-zA-Z0-9_]{1,50}$").unwrap();
    re.is_match(table_name)
}

/// Truncate to at most `max` bytes without splitting a character
fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // quote_identifier Tests
    // =========================================================================

    #[test]
    fn test_quote_identifier_simple() {
        assert_eq!(quote_identifier("my_table"), "\"my_table\"");
        assert_eq!(quote_identifier("name"), "\"name\"");
        assert_eq!(quote_identifier("a"), "\"a\"");
    }

    #[test]
    fn test_quote_identifier_with_quotes() {
        assert_eq!(
            quote_identifier("col\"with\"quotes"),
            "\"col\"\"with\"\"quotes\""
        );
        assert_eq!(quote_identifier("\"quoted\""), "\"\"\"quoted\"\"\"");
    }

    #[test]
    fn test_quote_identifier_with_spaces() {
        assert_eq!(quote_identifier("order id"), "\"order id\"");
    }

    #[test]
    fn test_quote_identifier_unicode() {
        assert_eq!(quote_identifier("姓名"), "\"姓名\"");
    }

    #[test]
    fn test_quote_identifier_reserved_keyword() {
        // Reserved keywords are inert once quoted
        assert_eq!(quote_identifier("select"), "\"select\"");
        assert_eq!(quote_identifier("table"), "\"table\"");
    }

    // =========================================================================
    // normalize_column_name Valid Cases Tests
    // =========================================================================

    #[test]
    fn test_normalize_simple() {
        assert_eq!(normalize_column_name("name").unwrap(), "name");
        assert_eq!(normalize_column_name("score").unwrap(), "score");
        assert_eq!(normalize_column_name("order_id").unwrap(), "order_id");
    }

    #[test]
    fn test_normalize_mixed_case_and_digits() {
        assert_eq!(normalize_column_name("Score2024").unwrap(), "Score2024");
        assert_eq!(normalize_column_name("a1b2c3").unwrap(), "a1b2c3");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_column_name("  name  ").unwrap(), "name");
    }

    #[test]
    fn test_normalize_inner_whitespace_kept() {
        assert_eq!(normalize_column_name("order id").unwrap(), "order id");
    }

    #[test]
    fn test_normalize_cjk() {
        assert_eq!(normalize_column_name("姓名").unwrap(), "姓名");
        assert_eq!(normalize_column_name("部门 编号").unwrap(), "部门 编号");
    }

    #[test]
    fn test_normalize_strips_dangerous_chars() {
        // Stripped characters leave a still-valid remainder
        assert_eq!(normalize_column_name("na'me").unwrap(), "name");
        assert_eq!(normalize_column_name("sc\"ore\"").unwrap(), "score");
        assert_eq!(normalize_column_name("a`b`c").unwrap(), "abc");
    }

    // =========================================================================
    // normalize_column_name Invalid Cases Tests
    // =========================================================================

    #[test]
    fn test_normalize_empty() {
        let result = normalize_column_name("");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("empty"));
    }

    #[test]
    fn test_normalize_only_stripped_chars() {
        assert!(normalize_column_name("<>;\"'").is_err());
    }

    #[test]
    fn test_normalize_injection_attempt() {
        // Semicolons are stripped but the space-separated keywords remain valid
        // charset-wise; parentheses and dashes are not
        assert!(normalize_column_name("x); DROP TABLE users; --").is_err());
    }

    #[test]
    fn test_normalize_hyphen() {
        assert!(normalize_column_name("kebab-case").is_err());
    }

    #[test]
    fn test_normalize_dot() {
        assert!(normalize_column_name("schema.column").is_err());
    }

    #[test]
    fn test_normalize_special_chars() {
        assert!(normalize_column_name("my@col").is_err());
        assert!(normalize_column_name("my#col").is_err());
        assert!(normalize_column_name("my$col").is_err());
    }

    #[test]
    fn test_normalize_too_long() {
        let long = "a".repeat(101);
        assert!(normalize_column_name(&long).is_err());

        let ok = "a".repeat(100);
        assert_eq!(normalize_column_name(&ok).unwrap(), ok);
    }

    #[test]
    fn test_normalize_truncates_before_validation() {
        // 300 ASCII bytes truncate to 255, which still exceeds the 100-char limit
        let long = "b".repeat(300);
        assert!(normalize_column_name(&long).is_err());
    }

    #[test]
    fn test_normalize_error_names_input() {
        let result = normalize_column_name("bad!name");
        assert!(result.unwrap_err().contains("bad!name"));
    }

    // =========================================================================
    // derive_table_name Tests
    // =========================================================================

    #[test]
    fn test_derive_table_name_from_uuid() {
        let table = derive_table_name("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(table, "dataset_550e8400_e29b_41");
        assert!(is_valid_table_name(&table));
    }

    #[test]
    fn test_derive_table_name_truncates() {
        let table = derive_table_name("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(table, "dataset_abcdefghijklmnop");
    }

    #[test]
    fn test_derive_table_name_filters_foreign_chars() {
        // Anything outside [A-Za-z0-9_] is discarded, not escaped
        let table = derive_table_name("ab\"c;d--e");
        assert_eq!(table, "dataset_abcd__e");
        assert!(is_valid_table_name(&table));
    }

    #[test]
    fn test_derive_table_name_stable() {
        let a = derive_table_name("550e8400-e29b-41d4-a716-446655440000");
        let b = derive_table_name("550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(a, b);
    }

    // =========================================================================
    // is_valid_table_name Tests
    // =========================================================================

    #[test]
    fn test_valid_table_names() {
        assert!(is_valid_table_name("dataset_abc123"));
        assert!(is_valid_table_name("dataset_550e8400_e29b_41"));
        assert!(is_valid_table_name("dataset_X"));
    }

    #[test]
    fn test_invalid_table_names() {
        assert!(!is_valid_table_name("dataset_"));
        assert!(!is_valid_table_name("datasets"));
        assert!(!is_valid_table_name("users"));
        assert!(!is_valid_table_name("dataset_abc-123"));
        assert!(!is_valid_table_name("dataset_abc; DROP TABLE x"));
        assert!(!is_valid_table_name(&format!("dataset_{}", "a".repeat(51))));
    }

    #[test]
    fn test_metadata_tables_are_not_droppable() {
        // The generated-name check is what keeps a corrupted metadata row from
        // pointing DROP TABLE at the metadata tables themselves
        assert!(!is_valid_table_name("datasets"));
        assert!(!is_valid_table_name("query_links"));
    }
}
