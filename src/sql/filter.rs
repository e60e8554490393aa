//! Filter compilation for the public query surface
//!
//! Converts an ordered condition set plus end-user search values into a
//! parameterized SQL WHERE clause.

use std::collections::HashMap;

use crate::error::{Result, StoreError};
use crate::link::ConditionDescriptor;
use crate::sql::sanitize::quote_identifier;

/// Build a WHERE clause from resolved conditions and user-supplied values
///
/// Returns a `(clause, params)` tuple where:
/// - `clause` is the SQL condition string with parameter placeholders ($1, $2, ...)
/// - `params` is a vector of parameter values to bind
///
/// Conditions are visited in their stored order. A required condition with no
/// non-empty value fails immediately with `MissingRequiredField` naming the
/// condition's display name; a non-empty value contributes a substring-match
/// predicate (`LIKE` with the value wrapped in `%`); an optional condition with
/// no value is omitted. Zero predicates compile to `TRUE`, an unfiltered scan.
///
/// Column identifiers are rendered through [`quote_identifier`]; only the search
/// values themselves are bound as parameters.
///
/// # Arguments
/// * `conditions` - The resolved, existence-filtered condition descriptors
/// * `values` - Mapping of column name to the visitor's search input
/// * `param_offset` - Starting parameter number (mutated to track next available)
pub fn build_filter_clause(
    conditions: &[ConditionDescriptor],
    values: &HashMap<String, String>,
    param_offset: &mut i32,
) -> Result<(String, Vec<String>)> {
    let mut predicates = Vec::new();
    let mut params = Vec::new();

    for condition in conditions {
        let value = values
            .get(&condition.column_name)
            .map(String::as_str)
            .filter(|v| !v.is_empty());

        match value {
            None if condition.required => {
                return Err(StoreError::missing_required_field(condition.name.clone()));
            }
            None => {}
            Some(v) => {
                predicates.push(format!(
                    "{} LIKE ${}",
                    quote_identifier(&condition.column_name),
                    param_offset
                ));
                params.push(format!("%{}%", v));
                *param_offset += 1;
            }
        }
    }

    let clause = if predicates.is_empty() {
        "TRUE".to_string()
    } else {
        predicates.join(" AND ")
    };

    Ok((clause, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(column: &str, display: &str, required: bool) -> ConditionDescriptor {
        ConditionDescriptor {
            id: column.to_string(),
            name: display.to_string(),
            column_name: column.to_string(),
            condition_type: "text".to_string(),
            multiple: false,
            required,
        }
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== Predicate Building ====================

    #[test]
    fn test_single_predicate() {
        let conditions = vec![descriptor("name", "Name", false)];
        let mut offset = 1;

        let (clause, params) =
            build_filter_clause(&conditions, &values(&[("name", "Al")]), &mut offset).unwrap();

        assert_eq!(clause, "\"name\" LIKE $1");
        assert_eq!(params, vec!["%Al%".to_string()]);
        assert_eq!(offset, 2);
    }

    #[test]
    fn test_multiple_predicates_preserve_order() {
        let conditions = vec![
            descriptor("name", "Name", false),
            descriptor("dept", "Department", false),
        ];
        let mut offset = 1;

        let (clause, params) = build_filter_clause(
            &conditions,
            &values(&[("dept", "sales"), ("name", "Al")]),
            &mut offset,
        )
        .unwrap();

        assert_eq!(clause, "\"name\" LIKE $1 AND \"dept\" LIKE $2");
        assert_eq!(params, vec!["%Al%".to_string(), "%sales%".to_string()]);
        assert_eq!(offset, 3);
    }

    #[test]
    fn test_optional_without_value_is_omitted() {
        let conditions = vec![
            descriptor("name", "Name", false),
            descriptor("score", "Score", false),
        ];
        let mut offset = 1;

        let (clause, params) =
            build_filter_clause(&conditions, &values(&[("score", "90")]), &mut offset).unwrap();

        assert_eq!(clause, "\"score\" LIKE $1");
        assert_eq!(params, vec!["%90%".to_string()]);
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let conditions = vec![descriptor("name", "Name", false)];
        let mut offset = 1;

        let (clause, params) =
            build_filter_clause(&conditions, &values(&[("name", "")]), &mut offset).unwrap();

        assert_eq!(clause, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_zero_predicates_is_full_scan() {
        let conditions = vec![descriptor("name", "Name", false)];
        let mut offset = 1;

        let (clause, params) =
            build_filter_clause(&conditions, &HashMap::new(), &mut offset).unwrap();

        assert_eq!(clause, "TRUE");
        assert!(params.is_empty());
        assert_eq!(offset, 1);
    }

    // ==================== Required Conditions ====================

    #[test]
    fn test_missing_required_fails_with_display_name() {
        let conditions = vec![descriptor("name", "Full Name", true)];
        let mut offset = 1;

        let err = build_filter_clause(&conditions, &HashMap::new(), &mut offset).unwrap_err();

        match err {
            StoreError::MissingRequiredField(field) => assert_eq!(field, "Full Name"),
            other => panic!("Expected MissingRequiredField, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_for_required_fails() {
        let conditions = vec![descriptor("name", "Name", true)];
        let mut offset = 1;

        let result = build_filter_clause(&conditions, &values(&[("name", "")]), &mut offset);

        assert!(matches!(result, Err(StoreError::MissingRequiredField(_))));
    }

    #[test]
    fn test_fails_fast_on_first_missing_required() {
        let conditions = vec![
            descriptor("a", "First", true),
            descriptor("b", "Second", true),
        ];
        let mut offset = 1;

        let err = build_filter_clause(&conditions, &HashMap::new(), &mut offset).unwrap_err();

        match err {
            StoreError::MissingRequiredField(field) => assert_eq!(field, "First"),
            other => panic!("Expected MissingRequiredField, got {:?}", other),
        }
    }

    #[test]
    fn test_required_with_value_builds_predicate() {
        let conditions = vec![descriptor("name", "Name", true)];
        let mut offset = 1;

        let (clause, params) =
            build_filter_clause(&conditions, &values(&[("name", "Bob")]), &mut offset).unwrap();

        assert_eq!(clause, "\"name\" LIKE $1");
        assert_eq!(params, vec!["%Bob%".to_string()]);
    }

    // ==================== Injection Safety ====================

    #[test]
    fn test_value_is_bound_not_interpolated() {
        let conditions = vec![descriptor("name", "Name", false)];
        let mut offset = 1;

        let (clause, params) = build_filter_clause(
            &conditions,
            &values(&[("name", "'; DROP TABLE x; --")]),
            &mut offset,
        )
        .unwrap();

        assert!(!clause.contains("DROP TABLE"));
        assert_eq!(params, vec!["%'; DROP TABLE x; --%".to_string()]);
    }

    #[test]
    fn test_column_with_embedded_quote_is_escaped() {
        let conditions = vec![descriptor("na\"me", "Name", false)];
        let mut offset = 1;

        let (clause, _) =
            build_filter_clause(&conditions, &values(&[("na\"me", "x")]), &mut offset).unwrap();

        assert_eq!(clause, "\"na\"\"me\" LIKE $1");
    }

    // ==================== Parameter Offset Tracking ====================

    #[test]
    fn test_param_offset_tracking() {
        let conditions = vec![
            descriptor("a", "A", false),
            descriptor("b", "B", false),
            descriptor("c", "C", false),
        ];
        let mut offset = 5;

        let (clause, params) = build_filter_clause(
            &conditions,
            &values(&[("a", "1"), ("b", "2"), ("c", "3")]),
            &mut offset,
        )
        .unwrap();

        assert!(clause.contains("$5"));
        assert!(clause.contains("$6"));
        assert!(clause.contains("$7"));
        assert_eq!(params.len(), 3);
        assert_eq!(offset, 8);
    }
}
