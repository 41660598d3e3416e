//! WHERE / SET clause assembly with named placeholders.
//!
//! A scalar criterion for column `c` under prefix `w` renders as `c = :w_c`;
//! a list renders as `c IN (:w_c_1, :w_c_2, ...)`. The returned [`NamedParams`]
//! lists every generated name in the same order it appears in the SQL.

use crate::criteria::{Criteria, NamedParams};
use crate::error::TableDaoError;
use crate::ident::{placeholder_stem, validate_identifier};
use crate::types::{CriteriaValue, RowValues};

/// Prefix for WHERE criteria placeholders.
pub const WHERE_PREFIX: &str = "w";
/// Prefix for assignment/insert value placeholders.
pub const VALUE_PREFIX: &str = "v";
/// Prefix for filter LIKE placeholders.
pub const LIKE_PREFIX: &str = "l";
/// Prefix for relevance-search placeholders.
pub const SEARCH_PREFIX: &str = "s";

/// SQL fragment plus the parameters it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub params: NamedParams,
}

/// Placeholder name (without `:`) for a scalar value.
#[must_use]
pub fn scalar_placeholder(prefix: &str, column: &str) -> String {
    format!("{prefix}_{}", placeholder_stem(column))
}

/// Placeholder name (without `:`) for the 1-based `position` in a list value.
#[must_use]
pub fn list_placeholder(prefix: &str, column: &str, position: usize) -> String {
    format!("{prefix}_{}_{position}", placeholder_stem(column))
}

/// Build the condition list for a WHERE clause, without the `WHERE` keyword.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` if `criteria` is empty, a list value is empty,
/// or a column is not a valid identifier.
pub fn build_where(criteria: &Criteria, prefix: &str) -> Result<Clause, TableDaoError> {
    if criteria.is_empty() {
        return Err(TableDaoError::invalid("WHERE criteria must not be empty"));
    }
    let mut conditions = Vec::with_capacity(criteria.len());
    let mut params = NamedParams::new();

    for (column, value) in criteria.iter() {
        validate_identifier(column, "column")?;
        match value {
            CriteriaValue::Scalar(v) => {
                let name = scalar_placeholder(prefix, column);
                conditions.push(format!("{column} = :{name}"));
                params.push_unique(name, v.clone())?;
            }
            CriteriaValue::List(values) => {
                if values.is_empty() {
                    return Err(TableDaoError::invalid(format!(
                        "IN list for column '{column}' must not be empty"
                    )));
                }
                let mut names = Vec::with_capacity(values.len());
                for (i, v) in values.iter().enumerate() {
                    let name = list_placeholder(prefix, column, i + 1);
                    names.push(format!(":{name}"));
                    params.push_unique(name, v.clone())?;
                }
                conditions.push(format!("{column} IN ({})", names.join(", ")));
            }
        }
    }

    Ok(Clause {
        sql: conditions.join(" AND "),
        params,
    })
}

/// Build a comma-joined `column = :prefix_column` assignment list for UPDATE.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` if `values` is empty, contains a list value,
/// or names an invalid column.
pub fn build_values(values: &Criteria, prefix: &str) -> Result<Clause, TableDaoError> {
    let scalars = scalar_values(values)?;
    let mut assignments = Vec::with_capacity(scalars.len());
    let mut params = NamedParams::new();
    for (column, value) in scalars {
        let name = scalar_placeholder(prefix, column);
        assignments.push(format!("{column} = :{name}"));
        params.push_unique(name, value.clone())?;
    }
    Ok(Clause {
        sql: assignments.join(", "),
        params,
    })
}

/// Build the `(cols) VALUES (:v_col, ...)` tail of an INSERT.
///
/// # Errors
/// Same conditions as [`build_values`].
pub fn build_insert_values(values: &Criteria, prefix: &str) -> Result<Clause, TableDaoError> {
    let scalars = scalar_values(values)?;
    let mut columns = Vec::with_capacity(scalars.len());
    let mut names = Vec::with_capacity(scalars.len());
    let mut params = NamedParams::new();
    for (column, value) in scalars {
        let name = scalar_placeholder(prefix, column);
        columns.push(column);
        names.push(format!(":{name}"));
        params.push_unique(name, value.clone())?;
    }
    Ok(Clause {
        sql: format!("({}) VALUES ({})", columns.join(", "), names.join(", ")),
        params,
    })
}

fn scalar_values(values: &Criteria) -> Result<Vec<(&str, &RowValues)>, TableDaoError> {
    if values.is_empty() {
        return Err(TableDaoError::invalid("value mapping must not be empty"));
    }
    values
        .iter()
        .map(|(column, value)| {
            validate_identifier(column, "column")?;
            match value {
                CriteriaValue::Scalar(v) => Ok((column, v)),
                CriteriaValue::List(_) => Err(TableDaoError::invalid(format!(
                    "column '{column}' takes a single value, not a list"
                ))),
            }
        })
        .collect()
}
