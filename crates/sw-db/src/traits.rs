//! Database trait definitions
//!
//! The runner talks to the database through three narrow traits. `Database`
//! is the umbrella that every backend gets for free once it implements all
//! three.

use crate::error::DbResult;
use async_trait::async_trait;
use sw_core::AppliedMap;

/// Script execution
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute a script of one or more statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Explicit transaction control.
///
/// Only one transaction may be open per backend at a time.
#[async_trait]
pub trait DatabaseTransaction: Send + Sync {
    /// Open a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Identifier of the transaction the next statement runs in.
    ///
    /// Stable inside an open transaction; changes once that transaction
    /// ends, including when a script issues its own COMMIT or ROLLBACK.
    async fn transaction_id(&self) -> DbResult<u64>;
}

/// Persistent record of applied migrations
#[async_trait]
pub trait DatabaseTracking: Send + Sync {
    /// Name of the tracking table this backend reads and writes
    fn tracking_table(&self) -> &str;

    /// Create the tracking table if it does not exist. Idempotent.
    async fn ensure_tracking_table(&self) -> DbResult<()>;

    /// Read every tracking record keyed by migration filename
    async fn load_applied(&self) -> DbResult<AppliedMap>;

    /// Record a migration as applied.
    ///
    /// Inserting an existing `(version, migration_name)` pair is a no-op. A
    /// row without a checksum for this migration gets `checksum` filled in.
    async fn record_application(
        &self,
        migration_name: &str,
        version: &str,
        checksum: &str,
    ) -> DbResult<()>;

    /// Delete every record for `migration_name`, returns rows removed
    async fn remove_application(&self, migration_name: &str) -> DbResult<usize>;
}

/// Full database capability used by the migration runner
pub trait Database: DatabaseCore + DatabaseTransaction + DatabaseTracking {}

impl<T: DatabaseCore + DatabaseTransaction + DatabaseTracking> Database for T {}
