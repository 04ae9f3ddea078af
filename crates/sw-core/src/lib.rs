//! sw-core - Core library for stepwise
//!
//! This crate provides the database-independent half of the migration
//! runner: filename parsing, directory discovery, checksums, the applied vs.
//! pending diff, the status view model, migration file generation, and
//! configuration loading.

pub mod applied;
pub mod checksum;
pub mod config;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod migration;
pub mod status;

pub use applied::{AppliedMap, AppliedRecord};
pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig};
pub use diff::{calculate_diff, ChecksumMismatch, MigrationDiff};
pub use discovery::{discover_migrations, Discovery, SkipReason, SkippedFile};
pub use error::{CoreError, CoreResult};
pub use generator::create_migration;
pub use migration::{parse_migration_filename, MigrationDefinition, MigrationFilename};
pub use status::{MigrationState, StatusEntry, StatusView};
