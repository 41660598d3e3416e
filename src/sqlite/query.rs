use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::TableDaoError;
use crate::results::ResultSet;
use crate::types::{FetchMode, RowValues};

use super::params::sqlite_value_to_row_value;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `TableDaoError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, TableDaoError> {
    let value: Value = row.get(idx)?;
    Ok(sqlite_value_to_row_value(value))
}

fn result_columns(stmt: &Statement<'_>, fetch_mode: FetchMode) -> Vec<String> {
    match fetch_mode {
        FetchMode::Associative => stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        FetchMode::Numeric => (0..stmt.column_count()).map(|i| i.to_string()).collect(),
    }
}

/// Run an already-bound statement and materialise every row.
///
/// # Errors
/// Returns `TableDaoError::SqliteError` if stepping the statement or reading a value fails.
pub fn build_result_set(
    stmt: &mut Statement<'_>,
    fetch_mode: FetchMode,
) -> Result<ResultSet, TableDaoError> {
    let column_names = Arc::new(result_columns(stmt, fetch_mode));
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(column_names);

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
