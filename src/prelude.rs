//! Convenient imports for common functionality.

pub use crate::config::TableConfig;
pub use crate::criteria::{Criteria, NamedParams};
pub use crate::dao::{Dao, Table};
pub use crate::error::TableDaoError;
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::sqlite::{DaoOptions, DaoOptionsBuilder};
pub use crate::statement::{
    FilterOptions, LikeOptions, Statement, count_statement, delete_id_statement,
    delete_range_statement, delete_where_statement, insert_statement, select_filter_statement,
    select_id_statement, select_like_statement, select_statement, select_where_statement,
    update_statement, update_where_statement,
};
pub use crate::types::{
    CriteriaValue, FetchMode, LikeJoin, RowValues, SortDirection, StatementKind,
};
