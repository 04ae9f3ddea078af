//! Error types for sw-runner

use sw_core::CoreError;
use sw_db::DbError;
use thiserror::Error;

/// Runner errors
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Discovery, config, or generator failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database failure outside a migration body
    #[error(transparent)]
    Db(#[from] DbError),

    /// R001: A migration failed and was rolled back; later ones were not run
    #[error(
        "[R001] Migration {migration} failed and was rolled back: {source}\n\
         Migrations committed in this run: {}\n\
         Last successfully applied migration: {}",
        .applied.len(),
        .last_applied.as_deref().unwrap_or("none")
    )]
    MigrationFailed {
        migration: String,
        applied: Vec<String>,
        last_applied: Option<String>,
        source: DbError,
    },

    /// R002: Executor was handed migrations that already have a record
    #[error("[R002] Refusing to re-apply already-applied migrations: {}", .migrations.join(", "))]
    AlreadyApplied { migrations: Vec<String> },

    /// R003: No reversal file for the requested migration
    #[error("[R003] No rollback available for {migration}: {path} does not exist")]
    RollbackUnavailable { migration: String, path: String },

    /// R004: Rollback requested for a migration with no tracking record
    #[error("[R004] Migration {migration} is not applied")]
    NotApplied { migration: String },

    /// R005: Reversal body or record removal failed and was rolled back
    #[error("[R005] Rollback of {migration} failed and was undone: {source}")]
    RollbackFailed { migration: String, source: DbError },

    /// R006: A file issued its own COMMIT or ROLLBACK inside the runner's transaction
    #[error(
        "[R006] {migration} ended the runner's transaction itself (COMMIT or ROLLBACK in the file); \
         its statements may already be committed and the tracking table was not changed. \
         Remove transaction control from the file and check the database by hand.\n\
         Migrations committed in this run: {}",
        .applied.len()
    )]
    TransactionEnded {
        migration: String,
        applied: Vec<String>,
    },
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
