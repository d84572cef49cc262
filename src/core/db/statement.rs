/// Statement Building Module
///
/// Builds the SQL text and bound parameters for the write operations of the
/// access object. Table and column names are interpolated into the SQL after
/// validation and quoting; values only ever travel as named parameters.

use crate::core::dialect::Dialect;
use crate::core::value::{Params, Record, Value};
use crate::core::{DbError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// SQL text plus the parameters it binds
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Params,
}

/// Checks that `identifier` can be interpolated into SQL as a plain name.
pub fn validate_identifier(identifier: &str) -> Result<&str> {
    if IDENTIFIER.is_match(identifier) {
        Ok(identifier)
    } else {
        Err(DbError::InvalidIdentifier(identifier.to_string()))
    }
}

fn validated_columns(data: &Record) -> Result<Vec<&str>> {
    data.columns().map(validate_identifier).collect()
}

/// Returns `count` comma-separated positional placeholders, e.g. `?,?,?`.
pub fn create_placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

/// `INSERT INTO t(c1,c2) VALUES(:c1,:c2)`
pub fn build_insert(dialect: &dyn Dialect, table: &str, data: &Record) -> Result<Statement> {
    Ok(Statement {
        sql: insert_sql(dialect, table, data)?,
        params: Params::from(data),
    })
}

fn insert_sql(dialect: &dyn Dialect, table: &str, data: &Record) -> Result<String> {
    let table = validate_identifier(table)?;
    if data.is_empty() {
        return Err(DbError::EmptyData(table.to_string()));
    }
    let columns = validated_columns(data)?;

    let quoted: Vec<String> = columns.iter().map(|c| dialect.quote_identifier(c)).collect();
    let placeholders: Vec<String> = columns.iter().map(|c| format!(":{}", c)).collect();

    Ok(format!(
        "INSERT INTO {}({}) VALUES({})",
        dialect.quote_identifier(table),
        quoted.join(","),
        placeholders.join(",")
    ))
}

/// `UPDATE t SET c1 = :c1, c2 = :c2 WHERE k = :k`
///
/// The key column is bound for the WHERE clause and left out of the SET list.
/// Fails without touching the database when `data` lacks `key`, carries a
/// NULL `key`, or holds nothing besides it.
pub fn build_update(
    dialect: &dyn Dialect,
    table: &str,
    data: &Record,
    key: &str,
) -> Result<Statement> {
    let table = validate_identifier(table)?;
    let key = validate_identifier(key)?;
    let columns = validated_columns(data)?;

    if matches!(data.get(key), None | Some(Value::Null)) {
        return Err(DbError::MissingKey {
            table: table.to_string(),
            key: key.to_string(),
        });
    }

    let assignments: Vec<String> = columns
        .iter()
        .filter(|column| **column != key)
        .map(|column| format!("{} = :{}", dialect.quote_identifier(column), column))
        .collect();
    if assignments.is_empty() {
        return Err(DbError::EmptyData(table.to_string()));
    }

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = :{}",
            dialect.quote_identifier(table),
            assignments.join(", "),
            dialect.quote_identifier(key),
            key
        ),
        params: Params::from(data),
    })
}

/// Insert every column of `data`; on a conflict over `keys`, overwrite every
/// non-key column with the incoming value.
pub fn build_upsert(
    dialect: &dyn Dialect,
    table: &str,
    data: &Record,
    keys: &[&str],
) -> Result<Statement> {
    let insert = insert_sql(dialect, table, data)?;
    for key in keys {
        validate_identifier(key)?;
    }

    let updates: Vec<&str> = data
        .columns()
        .filter(|column| !keys.contains(column))
        .collect();

    Ok(Statement {
        sql: format!("{}{}", insert, dialect.upsert_clause(keys, &updates)),
        params: Params::from(data),
    })
}

/// `DELETE FROM t WHERE k = :k`
pub fn build_delete(
    dialect: &dyn Dialect,
    table: &str,
    key: &str,
    value: Value,
) -> Result<Statement> {
    let table = validate_identifier(table)?;
    let key = validate_identifier(key)?;

    Ok(Statement {
        sql: format!(
            "DELETE FROM {} WHERE {} = :{}",
            dialect.quote_identifier(table),
            dialect.quote_identifier(key),
            key
        ),
        params: Params::new().with_value(key, value),
    })
}
