/// Database Module
///
/// This module provides the database plumbing behind the access object,
/// organized into focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): Opens connections and tracks the lazy handle
/// - **Statement Building** (`statement.rs`): Builds SQL and parameters for write operations
/// - **Query Execution** (`query.rs`): Binds parameters, runs statements and collects rows
/// - **Schema Introspection** (`schema.rs`): Reads the table catalog
///
/// ## Error Handling
///
/// All database operations use the standardized `DbError` type for consistent error propagation.
pub mod connection;
pub mod query;
pub mod schema;
pub mod statement;

pub use connection::*;
pub use query::*;
pub use schema::*;
pub use statement::*;
