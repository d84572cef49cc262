//! The database access object.
//!
//! [`Database`] lazily connects from a credential snapshot and offers
//! insert / update / upsert / delete helpers plus thin fetch wrappers over raw
//! queries. Table and column names are interpolated into SQL after validation;
//! values are always bound.
//!
//! Unless built with [`TableGuard::Trust`], every table-targeting write first
//! checks the table catalog and fails with [`DbError::TableNotFound`] before
//! anything is written.
//!
//! Only SQLite executes. MySQL credentials are rejected by [`Database::new`];
//! MySQL SQL is available for other drivers through the statement builders in
//! [`crate::core::db`] together with [`crate::core::MySqlDialect`].

use crate::core::db::{self, ConnectTarget, ConnectionState, QueryExecutor, ResultSet};
use crate::core::dialect::{dialect_for, Dialect};
use crate::core::{ConnectionOptions, Credentials, DbError, Params, Record, Result, Value};
use tracing::{debug, warn};

/// Whether write operations confirm that their table exists first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableGuard {
    /// Query the table catalog before every table-targeting operation
    #[default]
    Verify,
    /// Skip the catalog query; a missing table surfaces as a driver error
    Trust,
}

/// Access object over a single, lazily opened connection.
#[derive(Debug)]
pub struct Database {
    target: ConnectTarget,
    guard: TableGuard,
    options: ConnectionOptions,
    dialect: &'static dyn Dialect,
    state: ConnectionState,
}

impl Database {
    /// Builds an access object. No connection is opened until the first
    /// operation needs one.
    ///
    /// Fails with [`DbError::Config`] for drivers this build cannot execute
    /// against (see [`crate::core::DriverType::is_executable`]).
    pub fn new(credentials: &dyn Credentials, guard: TableGuard) -> Result<Self> {
        let driver = credentials.driver();
        if !driver.is_executable() {
            return Err(DbError::Config(format!(
                "{} is supported for SQL generation only; build statements with its dialect instead",
                driver
            )));
        }
        Ok(Database {
            target: ConnectTarget::from_credentials(credentials),
            guard,
            options: credentials.options().clone(),
            dialect: dialect_for(driver),
            state: ConnectionState::Unconnected,
        })
    }

    pub fn guard(&self) -> TableGuard {
        self.guard
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    pub fn connection_options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Replaces the connection options and discards the open connection, if
    /// any. The next operation reconnects with the new options.
    pub fn set_connection_options(&mut self, options: ConnectionOptions) {
        self.options = options;
        self.state.reset();
    }

    /// Discards the open connection, if any.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Runs a raw query with bound parameters and returns its materialized
    /// result.
    pub fn execute(&mut self, query: &str, params: &Params) -> Result<ResultSet> {
        let conn = self.state.connect(&self.target, &self.options)?;
        QueryExecutor::new(conn).execute(query, params)
    }

    /// Runs a raw INSERT and returns the id generated for the new row.
    pub fn execute_insert(&mut self, query: &str, params: &Params) -> Result<i64> {
        let conn = self.state.connect(&self.target, &self.options)?;
        QueryExecutor::new(conn).execute_insert(query, params)
    }

    pub fn fetch(&mut self, query: &str, params: &Params) -> Result<Option<Record>> {
        Ok(self.execute(query, params)?.fetch())
    }

    pub fn fetch_all(&mut self, query: &str, params: &Params) -> Result<Vec<Record>> {
        Ok(self.execute(query, params)?.fetch_all())
    }

    pub fn fetch_column(&mut self, query: &str, params: &Params) -> Result<Option<Value>> {
        Ok(self.execute(query, params)?.fetch_column())
    }

    /// Tables listed in the catalog of the configured database.
    pub fn list_tables(&mut self) -> Result<Vec<String>> {
        let conn = self.state.connect(&self.target, &self.options)?;
        db::list_tables(conn, self.dialect, &self.target.name)
    }

    pub fn table_exists(&mut self, table: &str) -> Result<bool> {
        let conn = self.state.connect(&self.target, &self.options)?;
        db::table_exists(conn, self.dialect, &self.target.name, table)
    }

    fn ensure_table_exists(&mut self, table: &str) -> Result<()> {
        if self.guard == TableGuard::Trust {
            return Ok(());
        }
        if !self.table_exists(table)? {
            warn!("rejecting operation on missing table {}", table);
            return Err(DbError::TableNotFound(table.to_string()));
        }
        Ok(())
    }

    /// Deletes every row of `table` whose `key` column equals `value`.
    pub fn delete(&mut self, table: &str, key: &str, value: impl Into<Value>) -> Result<()> {
        let stmt = db::build_delete(self.dialect, table, key, value.into())?;
        self.ensure_table_exists(table)?;
        let result = self.execute(&stmt.sql, &stmt.params)?;
        debug!("deleted {} rows from {}", result.rows_affected, table);
        Ok(())
    }

    /// Inserts `data` as a new row and returns its generated id.
    pub fn insert(&mut self, table: &str, data: &Record) -> Result<i64> {
        let stmt = db::build_insert(self.dialect, table, data)?;
        self.ensure_table_exists(table)?;
        self.execute_insert(&stmt.sql, &stmt.params)
    }

    /// Updates the rows whose `key` column matches `data[key]` with the
    /// remaining columns of `data`.
    ///
    /// Fails with [`DbError::MissingKey`] before touching the database when
    /// `data` has no `key` column or its `key` is NULL.
    pub fn update(&mut self, table: &str, data: &Record, key: &str) -> Result<()> {
        let stmt = db::build_update(self.dialect, table, data, key)?;
        self.ensure_table_exists(table)?;
        let result = self.execute(&stmt.sql, &stmt.params)?;
        debug!("updated {} rows in {}", result.rows_affected, table);
        Ok(())
    }

    /// [`Database::update`] keyed by the `id` column.
    pub fn update_by_id(&mut self, table: &str, data: &Record) -> Result<()> {
        self.update(table, data, "id")
    }

    /// Inserts `data`, or when a row with the same `keys` already exists,
    /// overwrites its non-key columns with the values in `data`.
    pub fn insert_or_update(&mut self, table: &str, data: &Record, keys: &[&str]) -> Result<()> {
        let stmt = db::build_upsert(self.dialect, table, data, keys)?;
        self.ensure_table_exists(table)?;
        self.execute(&stmt.sql, &stmt.params)?;
        Ok(())
    }

    /// [`Database::insert_or_update`] keyed by the `id` column.
    pub fn insert_or_update_by_id(&mut self, table: &str, data: &Record) -> Result<()> {
        self.insert_or_update(table, data, &["id"])
    }
}
