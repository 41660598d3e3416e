use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableDaoError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Expected at most {expected} row(s), found {found}")]
    Cardinality { expected: usize, found: usize },

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}

impl TableDaoError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TableDaoError::InvalidInput(msg.into())
    }
}
