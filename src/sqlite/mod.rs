// SQLite glue for the table DAO.
//
// - config: connection options and opening
// - params: conversion from middleware values to SQLite values
// - bind: named-placeholder binding on a prepared statement
// - query: row extraction and result materialisation
// - executor: prepare/bind/execute for one statement

pub mod bind;
pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use bind::bind_named;
pub use config::{DaoOptions, DaoOptionsBuilder, open_connection};
pub use executor::execute_statement;
pub use query::build_result_set;
