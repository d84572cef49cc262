/// Query Execution Module
///
/// Prepares statements on a connection, binds parameters and materializes the
/// results into records.

use crate::core::value::{Params, Record, Value};
use crate::core::{DbError, Result};
use rusqlite::Connection;
use tracing::debug;

/// Materialized outcome of one executed statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column names from the query result
    pub columns: Vec<String>,
    /// Rows in the order the database returned them
    pub rows: Vec<Record>,
    /// Rows changed by a statement that returns no columns
    pub rows_affected: usize,
}

impl ResultSet {
    /// First row, if any
    pub fn fetch(self) -> Option<Record> {
        self.rows.into_iter().next()
    }

    pub fn fetch_all(self) -> Vec<Record> {
        self.rows
    }

    /// First column of the first row, if any
    pub fn fetch_column(self) -> Option<Value> {
        self.fetch()
            .and_then(|row| row.into_iter().next())
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Query execution service that operates on a database connection
pub struct QueryExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new QueryExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        QueryExecutor { connection }
    }

    /// Prepares `sql`, binds `params` and runs it to completion.
    ///
    /// Statements that produce columns are read fully into the result set;
    /// other statements report how many rows they changed.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Statement` when the driver rejects the SQL or the
    /// execution, and `DbError::Params` when the parameters do not match the
    /// placeholders of the statement.
    pub fn execute(&self, sql: &str, params: &Params) -> Result<ResultSet> {
        debug!("executing: {}", sql);
        let mut stmt = self.connection.prepare(sql)?;
        bind_params(&mut stmt, params)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        if columns.is_empty() {
            let rows_affected = stmt.raw_execute()?;
            return Ok(ResultSet {
                columns,
                rows: Vec::new(),
                rows_affected,
            });
        }

        let mut records = Vec::new();
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut record = Record::new();
            for (index, column) in columns.iter().enumerate() {
                record.set(column, row.get::<_, Value>(index)?);
            }
            records.push(record);
        }

        Ok(ResultSet {
            columns,
            rows: records,
            rows_affected: 0,
        })
    }

    /// Runs an INSERT and returns the id of the row it created.
    pub fn execute_insert(&self, sql: &str, params: &Params) -> Result<i64> {
        self.execute(sql, params)?;
        Ok(self.connection.last_insert_rowid())
    }
}

fn bind_params(stmt: &mut rusqlite::Statement<'_>, params: &Params) -> Result<()> {
    if !params.named.is_empty() && !params.positional.is_empty() {
        return Err(DbError::Params(
            "named and positional parameters cannot be mixed".to_string(),
        ));
    }

    let expected = stmt.parameter_count();
    let given = params.named.len() + params.positional.len();
    if expected != given {
        return Err(DbError::Params(format!(
            "statement expects {} parameters, {} given",
            expected, given
        )));
    }

    for (name, value) in &params.named {
        let index = stmt
            .parameter_index(name)?
            .ok_or_else(|| DbError::Params(format!("no parameter named {} in statement", name)))?;
        stmt.raw_bind_parameter(index, value)?;
    }
    for (offset, value) in params.positional.iter().enumerate() {
        stmt.raw_bind_parameter(offset + 1, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_test_table(conn: &Connection) {
        conn.execute_batch(
            "
            CREATE TABLE test (
                id INTEGER PRIMARY KEY,
                name TEXT,
                value REAL,
                data BLOB
            );
            INSERT INTO test (name, value) VALUES ('Alice', 123.45);
            INSERT INTO test (name, value) VALUES ('Bob', 678.90);
            INSERT INTO test (name, value, data) VALUES (NULL, NULL, X'48656C6C6F');
        ",
        )
        .unwrap();
    }

    #[test]
    fn test_query_execution() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_table(&conn);

        let executor = QueryExecutor::new(&conn);
        let result = executor
            .execute("SELECT id, name, value FROM test ORDER BY id", &Params::new())
            .unwrap();

        assert_eq!(result.columns, vec!["id", "name", "value"]);
        assert_eq!(result.len(), 3);
        assert_eq!(result.rows[0].get("name"), Some(&Value::from("Alice")));
        assert_eq!(result.rows[0].get("value"), Some(&Value::Real(123.45)));
        assert_eq!(result.rows[2].get("name"), Some(&Value::Null));
    }

    #[test]
    fn test_named_and_positional_binding() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_table(&conn);
        let executor = QueryExecutor::new(&conn);

        let named = executor
            .execute(
                "SELECT name FROM test WHERE id = :id",
                &Params::new().with_value("id", 2),
            )
            .unwrap();
        assert_eq!(named.fetch_column(), Some(Value::from("Bob")));

        let positional = executor
            .execute(
                "SELECT COUNT(*) FROM test WHERE id IN (?,?)",
                &Params::positional([1, 3]),
            )
            .unwrap();
        assert_eq!(positional.fetch_column(), Some(Value::Integer(2)));
    }

    #[test]
    fn test_parameter_mismatch() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_table(&conn);
        let executor = QueryExecutor::new(&conn);

        let missing = executor.execute("SELECT * FROM test WHERE id = :id", &Params::new());
        assert!(matches!(missing, Err(DbError::Params(_))));

        let wrong_name = executor.execute(
            "SELECT * FROM test WHERE id = :id",
            &Params::new().with_value("key", 1),
        );
        assert!(matches!(wrong_name, Err(DbError::Params(_))));

        let mixed = Params::new().with_value("id", 1).bind(2);
        assert!(matches!(
            executor.execute("SELECT * FROM test WHERE id = :id", &mixed),
            Err(DbError::Params(_))
        ));
    }

    #[test]
    fn test_write_reports_rows_affected() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_table(&conn);
        let executor = QueryExecutor::new(&conn);

        let result = executor
            .execute("UPDATE test SET value = 0 WHERE name IS NOT NULL", &Params::new())
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.rows_affected, 2);

        let id = executor
            .execute_insert(
                "INSERT INTO test (name) VALUES (:name)",
                &Params::new().with_value("name", "Carol"),
            )
            .unwrap();
        assert_eq!(id, 4);
    }

    #[test]
    fn test_query_error_handling() {
        let conn = Connection::open_in_memory().unwrap();
        let executor = QueryExecutor::new(&conn);

        match executor.execute("SELECT * FROM nonexistent_table", &Params::new()) {
            Err(DbError::Statement(e)) => assert!(e.to_string().contains("no such table")),
            other => panic!("Expected Statement error, got {:?}", other),
        }
    }

    #[test]
    fn test_blob_and_empty_fetch() {
        let conn = Connection::open_in_memory().unwrap();
        setup_test_table(&conn);
        let executor = QueryExecutor::new(&conn);

        let blob = executor
            .execute("SELECT data FROM test WHERE id = 3", &Params::new())
            .unwrap()
            .fetch_column();
        assert_eq!(blob, Some(Value::Blob(b"Hello".to_vec())));

        let none = executor
            .execute("SELECT * FROM test WHERE id = 99", &Params::new())
            .unwrap();
        assert_eq!(none.clone().fetch(), None);
        assert_eq!(none.fetch_column(), None);
    }
}
