use rusqlite::Connection;
use tracing::{debug, trace};

use crate::criteria::NamedParams;
use crate::error::TableDaoError;
use crate::results::ResultSet;
use crate::types::{FetchMode, StatementKind};

use super::bind::bind_named;
use super::query::build_result_set;

/// Prepare, bind and execute one statement on `conn`.
///
/// `Select` statements return their rows shaped by `fetch_mode`; every other kind
/// returns an empty `ResultSet` carrying the number of rows changed. Nothing is
/// retried or wrapped in a transaction.
///
/// # Errors
/// Returns `TableDaoError::SqliteError` for driver failures and
/// `TableDaoError::InvalidInput` for placeholder mismatches.
pub fn execute_statement(
    conn: &Connection,
    sql: &str,
    params: &NamedParams,
    kind: StatementKind,
    fetch_mode: FetchMode,
) -> Result<ResultSet, TableDaoError> {
    debug!(sql, ?kind, params = params.len(), "executing statement");

    let mut stmt = conn.prepare_cached(sql)?;
    bind_named(&mut stmt, params)?;

    if kind.returns_rows() {
        let result_set = build_result_set(&mut stmt, fetch_mode)?;
        trace!(rows = result_set.len(), "select complete");
        Ok(result_set)
    } else {
        let changed = stmt.raw_execute()?;
        trace!(rows_affected = changed, "statement complete");
        Ok(ResultSet::affected(changed))
    }
}
