/// Core Module
///
/// Shared infrastructure for the access layer: error handling, values,
/// credentials, SQL dialects and the database plumbing.

pub mod credentials;
pub mod db;
pub mod dialect;
pub mod error;
pub mod value;

// Re-export commonly used types for convenience
pub use credentials::{ConnectionOptions, Credentials, DatabaseCredentials, DriverType};
pub use dialect::{Dialect, MySqlDialect, SqliteDialect};
pub use error::{DbError, Result};
pub use value::{Params, Record, Value};
