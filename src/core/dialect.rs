/// SQL Dialect Module
///
/// The parts of generated SQL that differ between drivers: identifier
/// quoting, the table catalog query and the upsert clause.

use crate::core::credentials::DriverType;

/// Driver-specific SQL fragments.
pub trait Dialect: std::fmt::Debug + Send + Sync {
    fn driver(&self) -> DriverType;

    /// Quotes an identifier that has already been validated.
    fn quote_identifier(&self, identifier: &str) -> String;

    /// Query listing the tables of `database`; the table name is the first column.
    fn table_catalog_sql(&self, database: &str) -> String;

    /// Clause appended to an INSERT so that a conflict on `keys` overwrites
    /// `updates` with the incoming values. Returned with a leading space.
    fn upsert_clause(&self, keys: &[&str], updates: &[&str]) -> String;
}

/// MySQL / MariaDB: backtick quoting, `SHOW TABLES`, `ON DUPLICATE KEY UPDATE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn driver(&self) -> DriverType {
        DriverType::Mysql
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier)
    }

    fn table_catalog_sql(&self, database: &str) -> String {
        format!("SHOW TABLES FROM {}", self.quote_identifier(database))
    }

    fn upsert_clause(&self, keys: &[&str], updates: &[&str]) -> String {
        let assignments: Vec<String> = if updates.is_empty() {
            // MySQL has no DO NOTHING; a self-assignment leaves the row untouched
            keys.iter()
                .take(1)
                .map(|key| {
                    let quoted = self.quote_identifier(key);
                    format!("{}={}", quoted, quoted)
                })
                .collect()
        } else {
            updates
                .iter()
                .map(|column| {
                    let quoted = self.quote_identifier(column);
                    format!("{}=VALUES({})", quoted, quoted)
                })
                .collect()
        };
        format!(" ON DUPLICATE KEY UPDATE {}", assignments.join(","))
    }
}

/// SQLite: double-quote quoting, `sqlite_master`, `ON CONFLICT ... DO UPDATE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn driver(&self) -> DriverType {
        DriverType::Sqlite
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier)
    }

    fn table_catalog_sql(&self, _database: &str) -> String {
        r"SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\'"
            .to_string()
    }

    fn upsert_clause(&self, keys: &[&str], updates: &[&str]) -> String {
        let target = if keys.is_empty() {
            String::new()
        } else {
            let quoted: Vec<String> = keys.iter().map(|k| self.quote_identifier(k)).collect();
            format!("({})", quoted.join(","))
        };

        if updates.is_empty() {
            return format!(" ON CONFLICT{} DO NOTHING", target);
        }

        let assignments: Vec<String> = updates
            .iter()
            .map(|column| {
                let quoted = self.quote_identifier(column);
                format!("{}=excluded.{}", quoted, quoted)
            })
            .collect();
        format!(" ON CONFLICT{} DO UPDATE SET {}", target, assignments.join(","))
    }
}

/// Returns the dialect used to generate SQL for `driver`.
pub fn dialect_for(driver: DriverType) -> &'static dyn Dialect {
    match driver {
        DriverType::Sqlite => &SqliteDialect,
        DriverType::Mysql => &MySqlDialect,
    }
}
