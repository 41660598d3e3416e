//! Table data-access object over `rusqlite`.
//!
//! Builds parameterized SELECT/INSERT/UPDATE/DELETE statements from ordered
//! criteria mappings and runs them, one at a time, on a single connection.
//!
//! ```rust
//! use table_dao::prelude::*;
//!
//! let stmt = select_where_statement(
//!     &TableConfig::new("users"),
//!     &Criteria::new().with("role", "admin").with("id", vec![1_i64, 2]),
//! )
//! .unwrap();
//! assert_eq!(
//!     stmt.sql,
//!     "SELECT * FROM users WHERE role = :w_role AND id IN (:w_id_1, :w_id_2)"
//! );
//! ```

pub mod clause;
pub mod config;
pub mod criteria;
pub mod dao;
pub mod error;
pub mod ident;
pub mod prelude;
pub mod results;
pub mod sqlite;
pub mod statement;
pub mod types;

pub use config::TableConfig;
pub use criteria::{Criteria, NamedParams};
pub use dao::{Dao, Table};
pub use error::TableDaoError;
pub use results::{CustomDbRow, ResultSet};
pub use sqlite::{DaoOptions, DaoOptionsBuilder};
pub use statement::{FilterOptions, LikeOptions, Statement};
pub use types::{CriteriaValue, FetchMode, LikeJoin, RowValues, SortDirection, StatementKind};
