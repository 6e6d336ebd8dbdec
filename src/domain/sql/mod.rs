//! Lexical, prefix-based SELECT-only SQL validator.
//!
//! No parser is built: validation is a handful of string checks against a
//! lowercased, trimmed copy of the query. False positives on forbidden
//! keywords appearing inside string literals are an accepted limitation,
//! not a bug — the upstream connection is opened read-only regardless.

use thiserror::Error;

/// Whether LIMIT/OFFSET are permitted in the query.
///
/// Widget-driven queries reject them because the widget layer injects its
/// own pagination; tool-driven queries allow them so the model can paginate
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlMode {
    Widget,
    Tool,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SqlValidationError(pub String);

impl SqlValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

const FORBIDDEN_PREFIXES: &[&str] = &[
    "drop", "delete", "update", "insert", "alter", "create", "truncate", "replace", "pragma",
];

/// Validates that `query` is a single, safe SELECT statement for the given mode.
pub fn validate_query(query: &str, mode: SqlMode) -> Result<(), SqlValidationError> {
    if query.trim().is_empty() {
        return Err(SqlValidationError::new("Query must be a non-empty string"));
    }

    if query.contains(';') {
        return Err(SqlValidationError::new(
            "Multiple statements are not allowed",
        ));
    }

    let lowered = query.trim().to_lowercase();
    for keyword in FORBIDDEN_PREFIXES {
        if lowered.starts_with(keyword) {
            return Err(SqlValidationError::new(format!(
                "{} operations are not allowed. Only SELECT queries are permitted.",
                keyword.to_uppercase()
            )));
        }
    }

    if mode == SqlMode::Widget {
        let padded = format!(" {} ", lowered);
        let has_limit_or_offset = [" limit ", " limit(", " offset ", " offset("]
            .iter()
            .any(|token| padded.contains(token));
        if has_limit_or_offset {
            return Err(SqlValidationError::new(
                "LIMIT and OFFSET are not allowed in widget queries; pagination is applied automatically.",
            ));
        }
    }

    Ok(())
}

/// Convenience wrapper matching call sites that want early-return semantics
/// via `?` rather than matching on the `Result` themselves.
pub fn validate_or_throw(query: &str, mode: SqlMode) -> Result<(), SqlValidationError> {
    validate_query(query, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_query() {
        assert!(validate_query("   ", SqlMode::Tool).is_err());
    }

    #[test]
    fn rejects_semicolon() {
        assert!(validate_query("SELECT 1; DROP TABLE users", SqlMode::Tool).is_err());
    }

    #[test]
    fn rejects_forbidden_prefixes_case_insensitively() {
        for kw in FORBIDDEN_PREFIXES {
            let q = format!("{} something", kw.to_uppercase());
            assert!(validate_query(&q, SqlMode::Tool).is_err(), "{kw} should be rejected");
        }
    }

    #[test]
    fn accepts_plain_select() {
        assert!(validate_query("SELECT * FROM users", SqlMode::Tool).is_ok());
    }

    #[test]
    fn tool_mode_allows_limit_offset() {
        assert!(validate_query("SELECT * FROM users LIMIT 10 OFFSET 5", SqlMode::Tool).is_ok());
    }

    #[test]
    fn widget_mode_rejects_standalone_limit() {
        assert!(validate_query("SELECT * FROM users LIMIT 10", SqlMode::Widget).is_err());
    }

    #[test]
    fn widget_mode_rejects_offset_with_paren() {
        assert!(validate_query("SELECT * FROM t OFFSET(5)", SqlMode::Widget).is_err());
    }

    #[test]
    fn widget_mode_allows_limit_as_substring_of_identifier() {
        // "limiter" is not a standalone "limit" token.
        assert!(validate_query("SELECT limiter FROM t", SqlMode::Widget).is_ok());
    }

    #[test]
    fn validator_is_idempotent() {
        let q = "SELECT * FROM users";
        assert_eq!(
            validate_query(q, SqlMode::Tool).is_ok(),
            validate_query(q, SqlMode::Tool).is_ok()
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mixed_case(s: &str) -> Vec<String> {
        // A couple of deterministic case permutations, cheaper than shrinking full case products.
        vec![
            s.to_lowercase(),
            s.to_uppercase(),
            s.chars()
                .enumerate()
                .map(|(i, c)| if i % 2 == 0 { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect(),
        ]
    }

    proptest! {
        #[test]
        fn any_casing_of_a_forbidden_prefix_is_rejected(idx in 0..FORBIDDEN_PREFIXES.len()) {
            let base = FORBIDDEN_PREFIXES[idx];
            for variant in mixed_case(&format!("{base} x")) {
                prop_assert!(validate_query(&variant, SqlMode::Tool).is_err());
            }
        }

        #[test]
        fn semicolons_are_always_rejected(suffix in "[a-zA-Z0-9 ]{0,20}") {
            let q = format!("SELECT 1;{suffix}");
            prop_assert!(validate_query(&q, SqlMode::Tool).is_err());
        }
    }
}
