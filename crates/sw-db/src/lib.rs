//! sw-db - Database layer for stepwise
//!
//! This crate provides the `Database` trait family and its DuckDB
//! implementation, including the tracking table that records which
//! migrations have been applied.

pub mod duckdb;
pub mod error;
pub mod tracking;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, DatabaseCore, DatabaseTracking, DatabaseTransaction};
