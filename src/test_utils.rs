/// # Test Utilities Module
///
/// Database fixtures for unit tests. Each fixture owns a SQLite file in its
/// own temporary directory, so access objects can reconnect to the same data
/// and tests stay isolated from one another.

use crate::access::{Database, TableGuard};
use crate::core::{DatabaseCredentials, DbError, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated on-disk database test fixture
pub struct DatabaseFixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl DatabaseFixture {
    /// Create an empty test database
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fixture.db");
        Connection::open(&path).map_err(|e| DbError::Connection(e.to_string()))?;
        Ok(DatabaseFixture { _dir: dir, path })
    }

    /// Create fixture with sample data schema
    pub fn with_sample_data() -> Result<Self> {
        let fixture = Self::new()?;
        let conn = fixture.connection()?;

        conn.execute_batch(
            "
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE,
                age INTEGER
            );

            CREATE TABLE categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT
            );

            CREATE TABLE post_categories (
                post_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                position INTEGER,
                PRIMARY KEY (post_id, category_id)
            );

            INSERT INTO users (name, email, age) VALUES ('alice', 'alice@example.com', 28);
            INSERT INTO users (name, email, age) VALUES ('bob', 'bob@example.com', 32);
            INSERT INTO users (name, email, age) VALUES ('charlie', 'charlie@example.com', 25);

            INSERT INTO categories (name, description) VALUES ('Technology', 'Posts about technology');
            INSERT INTO categories (name, description) VALUES ('Travel', 'Travel experiences');
        ",
        )?;

        Ok(fixture)
    }

    /// Opens a direct connection, bypassing the access object
    pub fn connection(&self) -> Result<Connection> {
        Connection::open(&self.path).map_err(|e| DbError::Connection(e.to_string()))
    }

    pub fn credentials(&self) -> DatabaseCredentials {
        DatabaseCredentials::sqlite(self.path.to_string_lossy().to_string())
    }

    /// Access object over the fixture database
    pub fn database(&self, guard: TableGuard) -> Database {
        Database::new(&self.credentials(), guard).expect("sqlite credentials are executable")
    }
}
