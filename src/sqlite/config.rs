use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TableDaoError;

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoOptions {
    pub db_path: String,
    #[serde(default)]
    pub journal_wal: bool,
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

fn default_foreign_keys() -> bool {
    true
}

impl DaoOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            journal_wal: false,
            foreign_keys: default_foreign_keys(),
            busy_timeout_ms: None,
        }
    }

    /// In-memory database, private to the connection.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> DaoOptionsBuilder {
        DaoOptionsBuilder::new(db_path)
    }

    fn is_memory(&self) -> bool {
        self.db_path == ":memory:" || self.db_path.contains("mode=memory")
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct DaoOptionsBuilder {
    opts: DaoOptions,
}

impl DaoOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: DaoOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn wal(mut self, journal_wal: bool) -> Self {
        self.opts.journal_wal = journal_wal;
        self
    }

    #[must_use]
    pub fn foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.opts.foreign_keys = foreign_keys;
        self
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn finish(self) -> DaoOptions {
        self.opts
    }
}

/// Open a connection and apply the configured pragmas.
///
/// # Errors
/// Returns `TableDaoError::ConfigError` for an empty path and
/// `TableDaoError::SqliteError` if opening or a pragma fails.
pub fn open_connection(opts: &DaoOptions) -> Result<Connection, TableDaoError> {
    if opts.db_path.trim().is_empty() {
        return Err(TableDaoError::ConfigError(
            "database path must not be empty".into(),
        ));
    }

    let flags = OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI;
    let conn = Connection::open_with_flags(&opts.db_path, flags)?;
    info!(db_path = %opts.db_path, "opened sqlite connection");

    if opts.journal_wal && !opts.is_memory() {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        debug!("journal_mode = WAL");
    }
    let fk = if opts.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {fk};"))?;
    debug!(foreign_keys = opts.foreign_keys, "foreign key enforcement set");

    if let Some(ms) = opts.busy_timeout_ms {
        conn.busy_timeout(Duration::from_millis(ms))?;
        debug!(busy_timeout_ms = ms, "busy timeout set");
    }

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let opts = DaoOptions::builder("app.db")
            .wal(true)
            .foreign_keys(false)
            .busy_timeout(Duration::from_millis(250))
            .finish();
        assert_eq!(opts.db_path, "app.db");
        assert!(opts.journal_wal);
        assert!(!opts.foreign_keys);
        assert_eq!(opts.busy_timeout_ms, Some(250));
    }

    #[test]
    fn deserialize_defaults() {
        let opts: DaoOptions = serde_json::from_str(r#"{"db_path":":memory:"}"#).unwrap();
        assert_eq!(opts, DaoOptions::in_memory());
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(
            open_connection(&DaoOptions::new("  ")),
            Err(TableDaoError::ConfigError(_))
        ));
    }

    #[test]
    fn foreign_keys_pragma_applied() {
        let conn = open_connection(&DaoOptions::in_memory()).unwrap();
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
            .unwrap();
        assert_eq!(on, 1);
    }
}
