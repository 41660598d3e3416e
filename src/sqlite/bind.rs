use rusqlite::Statement;

use crate::criteria::NamedParams;
use crate::error::TableDaoError;

use super::params::row_value_to_sqlite_value;

/// Bind every named parameter to its placeholder, in `params` order.
///
/// Every name in `params` must exist in the statement, appear once, and every
/// placeholder in the statement must receive a value; SQLite would otherwise bind
/// NULL (or the last duplicate) silently.
///
/// # Errors
/// Returns `TableDaoError::InvalidInput` for an unknown, repeated or unbound placeholder, or
/// `TableDaoError::SqliteError` if the driver rejects a value.
pub fn bind_named(stmt: &mut Statement<'_>, params: &NamedParams) -> Result<(), TableDaoError> {
    let expected = stmt.parameter_count();
    let mut bound = vec![false; expected];

    for (name, value) in params.iter() {
        let placeholder = format!(":{name}");
        let index = stmt.parameter_index(&placeholder)?.ok_or_else(|| {
            TableDaoError::invalid(format!("statement has no placeholder {placeholder}"))
        })?;
        match bound.get_mut(index - 1) {
            Some(slot) if *slot => {
                return Err(TableDaoError::invalid(format!(
                    "placeholder {placeholder} is given more than one value"
                )));
            }
            Some(slot) => *slot = true,
            None => {}
        }
        stmt.raw_bind_parameter(index, row_value_to_sqlite_value(value))?;
    }

    if let Some(missing) = bound.iter().position(|b| !b) {
        let name = stmt
            .parameter_name(missing + 1)
            .map_or_else(|| format!("?{}", missing + 1), str::to_string);
        return Err(TableDaoError::invalid(format!(
            "no value supplied for placeholder {name}"
        )));
    }
    Ok(())
}
