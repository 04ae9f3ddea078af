//! sw-runner - Migration runner for stepwise
//!
//! `MigrationRunner` is the explicit per-invocation context: it owns the
//! database handle and the resolved settings, and drives discovery, the
//! transactional executor, and the rollback executor.

pub mod error;
pub mod executor;
pub mod rollback;
pub mod runner;

pub use error::{RunnerError, RunnerResult};
pub use executor::{AppliedMigration, ApplyReport, MigrationPreview};
pub use rollback::RolledBack;
pub use runner::{MigrationRunner, Plan, RunnerSettings, UpReport};
