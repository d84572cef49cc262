/// Schema Introspection Module
///
/// Reads the table catalog of the connected database. The access object uses
/// it to confirm that a table exists before writing to it.

use crate::core::db::query::QueryExecutor;
use crate::core::dialect::Dialect;
use crate::core::value::{Params, Value};
use crate::core::Result;
use rusqlite::Connection;

/// Lists the tables of `database` using the dialect's catalog query.
pub fn list_tables(conn: &Connection, dialect: &dyn Dialect, database: &str) -> Result<Vec<String>> {
    let result = QueryExecutor::new(conn).execute(&dialect.table_catalog_sql(database), &Params::new())?;

    Ok(result
        .fetch_all()
        .into_iter()
        .filter_map(|row| match row.into_iter().next() {
            Some((_, Value::Text(name))) => Some(name),
            _ => None,
        })
        .collect())
}

/// Whether `table` appears in the catalog of `database`.
pub fn table_exists(
    conn: &Connection,
    dialect: &dyn Dialect,
    database: &str,
    table: &str,
) -> Result<bool> {
    Ok(list_tables(conn, dialect, database)?
        .iter()
        .any(|name| name == table))
}
