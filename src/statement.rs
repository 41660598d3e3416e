//! Statement assembly for every table operation.
//!
//! These functions are pure: they produce SQL text plus the named parameters it
//! references, and never touch a connection. [`crate::dao::Table`] feeds their
//! output to the executor.

use crate::clause::{
    Clause, LIKE_PREFIX, SEARCH_PREFIX, VALUE_PREFIX, WHERE_PREFIX, build_insert_values,
    build_values, build_where, list_placeholder, scalar_placeholder,
};
use crate::config::TableConfig;
use crate::criteria::{Criteria, NamedParams};
use crate::error::TableDaoError;
use crate::ident::{
    quote_identifier, validate_identifier, validate_order_expression, validate_ranking_expression,
};
use crate::types::{LikeJoin, RowValues, SortDirection, StatementKind};

/// A fully assembled statement ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: NamedParams,
    pub kind: StatementKind,
}

impl Statement {
    fn new(sql: String, params: NamedParams, kind: StatementKind) -> Self {
        Self { sql, params, kind }
    }
}

/// Options for a filtered select.
///
/// ```rust
/// use table_dao::prelude::*;
///
/// let opts = FilterOptions::new()
///     .criteria(Criteria::new().with("status", "active"))
///     .order("created_at")
///     .vector(SortDirection::Desc)
///     .limit(10);
/// let stmt = select_filter_statement(&TableConfig::new("posts"), &opts).unwrap();
/// assert_eq!(
///     stmt.sql,
///     "SELECT * FROM posts WHERE status = :w_status ORDER BY created_at DESC LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    columns: Vec<String>,
    criteria: Option<Criteria>,
    like: Vec<(String, String)>,
    order: Option<String>,
    vector: Option<SortDirection>,
    limit: Option<u64>,
}

impl FilterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Project a single column. May be called repeatedly.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    /// Prefix match on `column`; the pattern is lowercased and `%` appended.
    #[must_use]
    pub fn like(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        let column = column.into();
        let pattern = pattern.into();
        match self.like.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = pattern,
            None => self.like.push((column, pattern)),
        }
        self
    }

    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Sort direction; ignored unless an order is set.
    #[must_use]
    pub fn vector(mut self, vector: SortDirection) -> Self {
        self.vector = Some(vector);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for a relevance-ranked LIKE search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LikeOptions {
    columns: Vec<String>,
    like: Vec<(String, Vec<String>)>,
    join: LikeJoin,
    sort: SortDirection,
    order: Option<String>,
}

impl LikeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add one substring pattern for `column`. Repeated calls for the same column
    /// add further conditions on it.
    #[must_use]
    pub fn pattern(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        let column = column.into();
        let pattern = pattern.into();
        match self.like.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1.push(pattern),
            None => self.like.push((column, vec![pattern])),
        }
        self
    }

    #[must_use]
    pub fn patterns<I, S>(self, column: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let column = column.into();
        patterns
            .into_iter()
            .fold(self, |opts, p| opts.pattern(column.clone(), p))
    }

    #[must_use]
    pub fn join(mut self, join: LikeJoin) -> Self {
        self.join = join;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortDirection) -> Self {
        self.sort = sort;
        self
    }

    /// Explicit ordering key, replacing the computed relevance score. The direction
    /// comes from [`LikeOptions::sort`].
    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

fn table_name(config: &TableConfig) -> Result<&str, TableDaoError> {
    config.validate()?;
    Ok(config.table())
}

fn projection(columns: &[String]) -> Result<String, TableDaoError> {
    if columns.is_empty() {
        return Ok("*".to_string());
    }
    for column in columns {
        validate_identifier(column, "column")?;
    }
    Ok(columns.join(", "))
}

fn id_criteria(config: &TableConfig, id: impl Into<RowValues>) -> Criteria {
    let id: RowValues = id.into();
    Criteria::new().with(config.id_column(), id)
}

fn with_where(mut sql: String, clause: Clause, kind: StatementKind) -> Statement {
    sql.push_str(" WHERE ");
    sql.push_str(&clause.sql);
    Statement::new(sql, clause.params, kind)
}

/// `SELECT * FROM <table>`.
///
/// # Errors
/// Returns `TableDaoError::ConfigError` for an invalid table configuration.
pub fn select_statement(config: &TableConfig) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    Ok(Statement::new(
        format!("SELECT * FROM {table}"),
        NamedParams::new(),
        StatementKind::Select,
    ))
}

/// Single-record lookup by the identifier column.
///
/// # Errors
/// Returns `TableDaoError::ConfigError` for an invalid table configuration.
pub fn select_id_statement(
    config: &TableConfig,
    id: impl Into<RowValues>,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    let clause = build_where(&id_criteria(config, id), WHERE_PREFIX)?;
    Ok(with_where(
        format!("SELECT * FROM {table}"),
        clause,
        StatementKind::Select,
    ))
}

/// # Errors
/// Returns `TableDaoError::InvalidInput` if `criteria` is empty or malformed.
pub fn select_where_statement(
    config: &TableConfig,
    criteria: &Criteria,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    let clause = build_where(criteria, WHERE_PREFIX)?;
    Ok(with_where(
        format!("SELECT * FROM {table}"),
        clause,
        StatementKind::Select,
    ))
}

/// `SELECT COUNT(*) AS total FROM <table>`, optionally filtered.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` if `criteria` is present but empty or malformed.
pub fn count_statement(
    config: &TableConfig,
    criteria: Option<&Criteria>,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    let sql = format!("SELECT COUNT(*) AS total FROM {table}");
    match criteria {
        Some(criteria) => {
            let clause = build_where(criteria, WHERE_PREFIX)?;
            Ok(with_where(sql, clause, StatementKind::Select))
        }
        None => Ok(Statement::new(sql, NamedParams::new(), StatementKind::Select)),
    }
}

/// Projection, optional WHERE/LIKE filters, ordering and limit, in that order.
///
/// An empty `criteria` mapping is treated as absent. LIKE patterns are bound as
/// `lowercase(pattern) + "%"` under the `l` prefix.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` for invalid columns or ORDER BY expressions.
pub fn select_filter_statement(
    config: &TableConfig,
    opts: &FilterOptions,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    let mut sql = format!("SELECT {} FROM {table}", projection(&opts.columns)?);
    let mut params = NamedParams::new();
    let mut has_where = false;

    if let Some(criteria) = opts.criteria.as_ref().filter(|c| !c.is_empty()) {
        let clause = build_where(criteria, WHERE_PREFIX)?;
        sql.push_str(" WHERE ");
        sql.push_str(&clause.sql);
        params.extend(clause.params);
        has_where = true;
    }

    if !opts.like.is_empty() {
        let mut conditions = Vec::with_capacity(opts.like.len());
        for (column, pattern) in &opts.like {
            validate_identifier(column, "column")?;
            let name = scalar_placeholder(LIKE_PREFIX, column);
            conditions.push(format!("{column} LIKE :{name}"));
            params.push_unique(
                name,
                RowValues::Text(format!("{}%", pattern.to_lowercase())),
            )?;
        }
        sql.push_str(if has_where { " AND " } else { " WHERE " });
        sql.push_str(&conditions.join(" AND "));
    }

    if let Some(order) = &opts.order {
        sql.push_str(" ORDER BY ");
        sql.push_str(validate_order_expression(order)?);
        if let Some(vector) = opts.vector {
            sql.push(' ');
            sql.push_str(vector.as_sql());
        }
    }

    if let Some(limit) = opts.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Ok(Statement::new(sql, params, StatementKind::Select))
}

/// LIKE search ordered by relevance.
///
/// Each pattern becomes `"col" LIKE :s_col` (or `:s_col_N` when a column has several
/// patterns), bound as `%pattern%`. Without an explicit order the rows are ranked by
/// the number of conditions they satisfy.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` when no pattern is given or a column or
/// ordering expression is invalid.
pub fn select_like_statement(
    config: &TableConfig,
    opts: &LikeOptions,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    if opts.like.iter().all(|(_, patterns)| patterns.is_empty()) {
        return Err(TableDaoError::invalid("LIKE search needs at least one pattern"));
    }

    let mut conditions = Vec::new();
    let mut params = NamedParams::new();
    for (column, patterns) in &opts.like {
        validate_identifier(column, "column")?;
        let quoted = quote_identifier(column);
        let single = patterns.len() == 1;
        for (i, pattern) in patterns.iter().enumerate() {
            let name = if single {
                scalar_placeholder(SEARCH_PREFIX, column)
            } else {
                list_placeholder(SEARCH_PREFIX, column, i + 1)
            };
            conditions.push(format!("{quoted} LIKE :{name}"));
            params.push_unique(name, RowValues::Text(format!("%{pattern}%")))?;
        }
    }

    let ranking = match &opts.order {
        Some(order) => validate_ranking_expression(order)?.to_string(),
        None => conditions
            .iter()
            .map(|c| format!("CASE WHEN {c} THEN 1 ELSE 0 END"))
            .collect::<Vec<_>>()
            .join(" + "),
    };

    let separator = format!(" {} ", opts.join.as_sql());
    let sql = format!(
        "SELECT {} FROM {table} WHERE {} ORDER BY ({ranking}) {}",
        projection(&opts.columns)?,
        conditions.join(separator.as_str()),
        opts.sort.as_sql(),
    );
    Ok(Statement::new(sql, params, StatementKind::Select))
}

/// # Errors
/// Returns `TableDaoError::InvalidInput` if `values` is empty or holds a list.
pub fn insert_statement(
    config: &TableConfig,
    values: &Criteria,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    let clause = build_insert_values(values, VALUE_PREFIX)?;
    Ok(Statement::new(
        format!("INSERT INTO {table} {}", clause.sql),
        clause.params,
        StatementKind::Insert,
    ))
}

/// Update one record addressed by the identifier column.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` if `values` is empty or holds a list.
pub fn update_statement(
    config: &TableConfig,
    id: impl Into<RowValues>,
    values: &Criteria,
) -> Result<Statement, TableDaoError> {
    update_where_statement(config, values, &id_criteria(config, id))
}

/// # Errors
/// Returns `TableDaoError::InvalidInput` if either mapping is empty or malformed.
pub fn update_where_statement(
    config: &TableConfig,
    values: &Criteria,
    criteria: &Criteria,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    let assignments = build_values(values, VALUE_PREFIX)?;
    let clause = build_where(criteria, WHERE_PREFIX)?;
    let mut params = assignments.params;
    params.extend(clause.params);
    Ok(Statement::new(
        format!("UPDATE {table} SET {} WHERE {}", assignments.sql, clause.sql),
        params,
        StatementKind::Update,
    ))
}

/// # Errors
/// Returns `TableDaoError::ConfigError` for an invalid table configuration.
pub fn delete_id_statement(
    config: &TableConfig,
    id: impl Into<RowValues>,
) -> Result<Statement, TableDaoError> {
    delete_where_statement(config, &id_criteria(config, id))
}

/// # Errors
/// Returns `TableDaoError::InvalidInput` if `criteria` is empty or malformed.
pub fn delete_where_statement(
    config: &TableConfig,
    criteria: &Criteria,
) -> Result<Statement, TableDaoError> {
    let table = table_name(config)?;
    let clause = build_where(criteria, WHERE_PREFIX)?;
    Ok(with_where(
        format!("DELETE FROM {table}"),
        clause,
        StatementKind::Delete,
    ))
}

/// Delete every record whose identifier is in `ids`, each id bound separately.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` if `ids` is empty.
pub fn delete_range_statement(
    config: &TableConfig,
    ids: &[RowValues],
) -> Result<Statement, TableDaoError> {
    if ids.is_empty() {
        return Err(TableDaoError::invalid("delete range needs at least one id"));
    }
    let criteria = Criteria::new().with(config.id_column(), ids.to_vec());
    delete_where_statement(config, &criteria)
}
