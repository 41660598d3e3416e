use rusqlite::Connection;
use tracing::warn;

use crate::config::TableConfig;
use crate::criteria::{Criteria, NamedParams};
use crate::error::TableDaoError;
use crate::results::{CustomDbRow, ResultSet};
use crate::sqlite::{DaoOptions, execute_statement, open_connection};
use crate::statement::{
    FilterOptions, LikeOptions, Statement, count_statement, delete_id_statement,
    delete_range_statement, delete_where_statement, insert_statement, select_filter_statement,
    select_id_statement, select_like_statement, select_statement, select_where_statement,
    update_statement, update_where_statement,
};
use crate::types::{FetchMode, RowValues, StatementKind};

/// Data-access object over one `SQLite` connection.
///
/// Runs one statement at a time, synchronously. The connection is not shared or
/// pooled; callers needing concurrency use one `Dao` per unit of work.
///
/// ```rust
/// use table_dao::prelude::*;
///
/// # fn main() -> Result<(), TableDaoError> {
/// let dao = Dao::open(&DaoOptions::in_memory())?;
/// dao.execute_batch("CREATE TABLE users (id_users INTEGER PRIMARY KEY, name TEXT)")?;
///
/// let users = TableConfig::new("users");
/// let id = dao.table(&users).insert(&Criteria::new().with("name", "ada"))?;
/// let row = dao.table(&users).select_id(id)?.expect("inserted row");
/// assert_eq!(row.get("name"), Some(&RowValues::Text("ada".into())));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dao {
    conn: Connection,
}

impl Dao {
    /// Wrap a connection owned by the host application.
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open a connection from `opts`.
    ///
    /// # Errors
    /// Returns `TableDaoError` if the path is invalid or the connection cannot be opened.
    pub fn open(opts: &DaoOptions) -> Result<Self, TableDaoError> {
        open_connection(opts).map(Self::new)
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Release the underlying connection.
    #[must_use]
    pub fn into_inner(self) -> Connection {
        self.conn
    }

    /// A view of one table; each call builds fresh statements from `config`.
    #[must_use]
    pub fn table<'a>(&'a self, config: &'a TableConfig) -> Table<'a> {
        Table { dao: self, config }
    }

    /// Quote `text` as an SQL string literal using SQLite's own `quote()`.
    ///
    /// # Errors
    /// Returns `TableDaoError::SqliteError` if the driver call fails.
    pub fn quote(&self, text: &str) -> Result<String, TableDaoError> {
        Ok(self
            .conn
            .query_row("SELECT quote(?1)", [text], |row| row.get(0))?)
    }

    /// Run unparameterised SQL such as schema setup.
    ///
    /// # Errors
    /// Returns `TableDaoError::SqliteError` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), TableDaoError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a raw statement with named parameters.
    ///
    /// `kind` decides whether rows are fetched: `Select` returns them in associative
    /// form; the other kinds return an empty set with `rows_affected` filled in.
    ///
    /// # Errors
    /// Returns `TableDaoError` if binding or execution fails.
    pub fn query(
        &self,
        sql: &str,
        params: &NamedParams,
        kind: StatementKind,
    ) -> Result<ResultSet, TableDaoError> {
        self.query_with_mode(sql, params, kind, FetchMode::default())
    }

    /// [`Dao::query`] with an explicit fetch mode.
    ///
    /// # Errors
    /// Returns `TableDaoError` if binding or execution fails.
    pub fn query_with_mode(
        &self,
        sql: &str,
        params: &NamedParams,
        kind: StatementKind,
        fetch_mode: FetchMode,
    ) -> Result<ResultSet, TableDaoError> {
        execute_statement(&self.conn, sql, params, kind, fetch_mode)
    }

    /// Execute a statement produced by the builders in [`crate::statement`].
    ///
    /// # Errors
    /// Returns `TableDaoError` if binding or execution fails.
    pub fn run(&self, stmt: &Statement, fetch_mode: FetchMode) -> Result<ResultSet, TableDaoError> {
        execute_statement(&self.conn, &stmt.sql, &stmt.params, stmt.kind, fetch_mode)
    }
}

/// Table-scoped operations bound to one [`TableConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    dao: &'a Dao,
    config: &'a TableConfig,
}

impl Table<'_> {
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        self.config
    }

    fn run(&self, stmt: &Statement) -> Result<ResultSet, TableDaoError> {
        self.dao.run(stmt, self.config.fetch_mode())
    }

    /// Every row of the table.
    ///
    /// # Errors
    /// Returns `TableDaoError` if the statement fails.
    pub fn select(&self) -> Result<ResultSet, TableDaoError> {
        self.run(&select_statement(self.config)?)
    }

    /// The record whose identifier column equals `id`, if any.
    ///
    /// # Errors
    /// Returns `TableDaoError::Cardinality` if more than one row matches.
    pub fn select_id(&self, id: impl Into<RowValues>) -> Result<Option<CustomDbRow>, TableDaoError> {
        let result_set = self.run(&select_id_statement(self.config, id)?)?;
        match result_set.len() {
            0 | 1 => Ok(result_set.into_rows().into_iter().next()),
            found => {
                warn!(
                    table = self.config.table(),
                    found, "identifier lookup matched several rows"
                );
                Err(TableDaoError::Cardinality { expected: 1, found })
            }
        }
    }

    /// # Errors
    /// Returns `TableDaoError::InvalidInput` for empty or malformed criteria.
    pub fn select_where(&self, criteria: &Criteria) -> Result<ResultSet, TableDaoError> {
        self.run(&select_where_statement(self.config, criteria)?)
    }

    /// # Errors
    /// Returns `TableDaoError` if the options are invalid or the statement fails.
    pub fn select_filter(&self, opts: &FilterOptions) -> Result<ResultSet, TableDaoError> {
        self.run(&select_filter_statement(self.config, opts)?)
    }

    /// # Errors
    /// Returns `TableDaoError` if no pattern is given or the statement fails.
    pub fn select_like(&self, opts: &LikeOptions) -> Result<ResultSet, TableDaoError> {
        self.run(&select_like_statement(self.config, opts)?)
    }

    /// Number of rows, optionally restricted by `criteria`.
    ///
    /// # Errors
    /// Returns `TableDaoError` if the statement fails.
    pub fn count_where(&self, criteria: Option<&Criteria>) -> Result<i64, TableDaoError> {
        let result_set = self.dao.run(
            &count_statement(self.config, criteria)?,
            FetchMode::Associative,
        )?;
        result_set
            .first()
            .and_then(|row| row.get("total"))
            .and_then(RowValues::as_int)
            .copied()
            .ok_or_else(|| TableDaoError::ExecutionError("COUNT(*) returned no value".into()))
    }

    /// Insert one record and return its row id.
    ///
    /// # Errors
    /// Returns `TableDaoError` for empty or list-valued input, or driver failures.
    pub fn insert(&self, values: &Criteria) -> Result<i64, TableDaoError> {
        self.run(&insert_statement(self.config, values)?)?;
        Ok(self.dao.conn.last_insert_rowid())
    }

    /// Update the record addressed by `id`; returns the number of rows changed.
    ///
    /// # Errors
    /// Returns `TableDaoError` for empty or list-valued input, or driver failures.
    pub fn update(&self, id: impl Into<RowValues>, values: &Criteria) -> Result<usize, TableDaoError> {
        Ok(self.run(&update_statement(self.config, id, values)?)?.rows_affected)
    }

    /// # Errors
    /// Returns `TableDaoError` for empty or malformed mappings, or driver failures.
    pub fn update_where(&self, values: &Criteria, criteria: &Criteria) -> Result<usize, TableDaoError> {
        Ok(self
            .run(&update_where_statement(self.config, values, criteria)?)?
            .rows_affected)
    }

    /// # Errors
    /// Returns `TableDaoError` if the statement fails.
    pub fn delete_id(&self, id: impl Into<RowValues>) -> Result<usize, TableDaoError> {
        Ok(self.run(&delete_id_statement(self.config, id)?)?.rows_affected)
    }

    /// # Errors
    /// Returns `TableDaoError::InvalidInput` for empty or malformed criteria.
    pub fn delete_where(&self, criteria: &Criteria) -> Result<usize, TableDaoError> {
        Ok(self.run(&delete_where_statement(self.config, criteria)?)?.rows_affected)
    }

    /// Delete every record whose identifier is listed in `ids`.
    ///
    /// # Errors
    /// Returns `TableDaoError::InvalidInput` if `ids` is empty.
    pub fn delete_range(&self, ids: &[RowValues]) -> Result<usize, TableDaoError> {
        Ok(self.run(&delete_range_statement(self.config, ids)?)?.rows_affected)
    }
}
