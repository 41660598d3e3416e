use serde::{Deserialize, Serialize};

use crate::error::TableDaoError;
use crate::ident::validate_identifier;
use crate::types::FetchMode;

/// Per-table settings handed to every operation.
///
/// Immutable once built; use the `with_*` methods to derive a new value.
///
/// ```rust
/// use table_dao::prelude::*;
///
/// let users = TableConfig::new("users");
/// assert_eq!(users.id_column(), "id_users");
///
/// let people = TableConfig::new("people").with_id_column("person_id");
/// assert_eq!(people.id_column(), "person_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    table: String,
    #[serde(default)]
    id_column: Option<String>,
    #[serde(default)]
    fetch_mode: FetchMode,
}

impl TableConfig {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            id_column: None,
            fetch_mode: FetchMode::default(),
        }
    }

    #[must_use]
    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = Some(id_column.into());
        self
    }

    #[must_use]
    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The identifier column, `id_<table>` unless overridden.
    #[must_use]
    pub fn id_column(&self) -> String {
        match &self.id_column {
            Some(col) => col.clone(),
            None => format!("id_{}", self.table.rsplit('.').next().unwrap_or(&self.table)),
        }
    }

    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Check table and identifier names.
    ///
    /// # Errors
    /// Returns `TableDaoError::ConfigError` if either name is not a valid identifier.
    pub fn validate(&self) -> Result<(), TableDaoError> {
        validate_identifier(&self.table, "table name")
            .and_then(|_| validate_identifier(&self.id_column(), "identifier column").map(|_| ()))
            .map_err(|e| TableDaoError::ConfigError(e.to_string()))
    }
}
