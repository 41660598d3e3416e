//! Identifier checks for names that are spliced into SQL text.
//!
//! Values are always bound; table names, column names and ORDER BY
//! expressions cannot be, so they are validated before interpolation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TableDaoError;

// Optionally schema-qualified: `users`, `main.users`.
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier pattern compiles")
});

// Comma-separated keys: a column, a qualified column, a call such as
// `length(name)` or `count(*)`, or a position. Quotes, operators, comments and
// subqueries never match.
fn order_pattern(with_direction: bool) -> String {
    let name = r"[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)?";
    let arg = format!(r"(?:{name}|\d+)");
    let call = format!(r"[A-Za-z_][A-Za-z0-9_]*\(\s*(?:\*|{arg}(?:\s*,\s*{arg})*)?\s*\)");
    let term = format!(r"(?:{call}|{name}|\d+)");
    if !with_direction {
        return format!(r"^{term}$");
    }
    let key = format!(r"{term}(?:\s+(?i:ASC|DESC))?");
    format!(r"^{key}(?:\s*,\s*{key})*$")
}

static ORDER_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&order_pattern(true)).expect("order pattern compiles"));

static RANKING_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&order_pattern(false)).expect("ranking pattern compiles"));

/// Check that `name` is a plain or schema-qualified SQL identifier.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` naming the offending identifier.
pub fn validate_identifier<'a>(name: &'a str, what: &str) -> Result<&'a str, TableDaoError> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(TableDaoError::invalid(format!("invalid {what} '{name}'")))
    }
}

/// Check an ORDER BY list: comma-separated columns, calls or positions, each with
/// an optional `ASC`/`DESC`.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` for empty input or anything else, including
/// quotes, statement separators, comment markers and subqueries.
pub fn validate_order_expression(expr: &str) -> Result<&str, TableDaoError> {
    check_order(expr, &ORDER_EXPR)
}

/// A single ORDER BY key with no direction keyword, for an expression that is
/// wrapped in parentheses and followed by its own direction.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` as above, and for a list or an `ASC`/`DESC`.
pub fn validate_ranking_expression(expr: &str) -> Result<&str, TableDaoError> {
    check_order(expr, &RANKING_EXPR)
}

fn check_order<'a>(expr: &'a str, pattern: &Regex) -> Result<&'a str, TableDaoError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() || !pattern.is_match(trimmed) {
        return Err(TableDaoError::invalid(format!(
            "invalid ORDER BY expression '{expr}'"
        )));
    }
    Ok(trimmed)
}

/// Double-quote an identifier, one quote per dotted segment.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Placeholder-safe form of a column name: `t.col` becomes `t_col`.
#[must_use]
pub fn placeholder_stem(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(validate_identifier("users", "table").is_ok());
        assert!(validate_identifier("main.users", "table").is_ok());
        assert!(validate_identifier("_x1", "column").is_ok());
        assert!(validate_identifier("1abc", "column").is_err());
        assert!(validate_identifier("name; DROP TABLE x", "column").is_err());
        assert!(validate_identifier("a.b.c", "column").is_err());
        assert!(validate_identifier("", "column").is_err());
    }

    #[test]
    fn order_expressions() {
        assert_eq!(validate_order_expression(" created_at ").unwrap(), "created_at");
        assert!(validate_order_expression("length(name) DESC, id").is_ok());
        assert!(validate_order_expression("id; DELETE FROM t").is_err());
        assert!(validate_order_expression("id -- comment").is_err());
        assert!(validate_order_expression("'x'").is_err());
        assert!(validate_order_expression("  ").is_err());
        assert!(validate_order_expression("count(*) desc, 2").is_ok());
        assert!(validate_order_expression("(SELECT count(*) FROM sqlite_master)").is_err());
        assert!(validate_order_expression("id, (SELECT 1)").is_err());
        assert!(validate_order_expression("id /* x */").is_err());
    }

    #[test]
    fn ranking_expressions_carry_no_direction() {
        assert!(validate_ranking_expression("name").is_ok());
        assert!(validate_ranking_expression("length(t.name)").is_ok());
        assert!(validate_ranking_expression("name DESC").is_err());
        assert!(validate_ranking_expression("a, b").is_err());
    }

    #[test]
    fn quoting_and_stems() {
        assert_eq!(quote_identifier("name"), "\"name\"");
        assert_eq!(quote_identifier("t.name"), "\"t\".\"name\"");
        assert_eq!(placeholder_stem("t.name"), "t_name");
    }
}
