// Core infrastructure modules
pub mod core;

// Access layer
pub mod access;
pub mod config;

#[cfg(test)]
mod test_utils;

pub use access::{Database, TableGuard};
pub use crate::core::{
    ConnectionOptions, Credentials, DatabaseCredentials, DbError, DriverType, Params, Record,
    Result, Value,
};
pub use crate::core::db::{create_placeholders, ResultSet};
