//! The per-invocation runner context

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sw_core::discovery::find_rollback;
use sw_core::{
    calculate_diff, discover_migrations, ChecksumMismatch, Config, Discovery, MigrationDiff,
    SkippedFile, StatusView,
};
use sw_db::{Database, DbError};

use crate::error::RunnerResult;
use crate::executor::ApplyReport;

/// Settings resolved from config for one invocation
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Directory holding forward migrations
    pub migrations_dir: PathBuf,

    /// Directory holding reversal files
    pub rollbacks_dir: PathBuf,

    /// Release tag written into new tracking records
    pub release_version: String,

    /// Body characters shown per migration in a dry run
    pub preview_chars: usize,
}

impl RunnerSettings {
    /// Resolve settings from a loaded config relative to `root`
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self {
            migrations_dir: config.migrations_path_absolute(root),
            rollbacks_dir: config.rollbacks_path_absolute(root),
            release_version: config.release_version.clone(),
            preview_chars: config.preview_chars,
        }
    }
}

/// Discovered catalog and its diff against the tracking table
#[derive(Debug, Clone)]
pub struct Plan {
    pub discovery: Discovery,
    pub diff: MigrationDiff,
}

/// Outcome of `up`
#[derive(Debug, Clone)]
pub struct UpReport {
    /// Applied migrations whose file changed; reported, never re-applied
    pub modified: Vec<ChecksumMismatch>,

    /// Files ignored by discovery
    pub skipped: Vec<SkippedFile>,

    /// What the executor did
    pub apply: ApplyReport,
}

/// Explicit runner context holding the connection and settings.
///
/// Built once per invocation; every operation recomputes state from disk
/// and the tracking table instead of caching it.
pub struct MigrationRunner {
    pub(crate) db: Arc<dyn Database>,
    pub(crate) settings: RunnerSettings,
}

/// Tracking-table change made in the same transaction as a script
pub(crate) enum TrackingStep<'a> {
    Record {
        migration_name: &'a str,
        version: &'a str,
        checksum: &'a str,
    },
    Remove {
        migration_name: &'a str,
    },
}

/// Why `transact` did not commit
#[derive(Debug)]
pub(crate) enum StepFailure {
    /// Script, tracking write, or COMMIT failed; the transaction was rolled back
    Db(DbError),
    /// The script closed the transaction itself; tracking was left untouched
    TransactionEnded,
}

impl From<DbError> for StepFailure {
    fn from(e: DbError) -> Self {
        StepFailure::Db(e)
    }
}

impl MigrationRunner {
    /// Create a runner and make sure the tracking table exists
    pub async fn connect(db: Arc<dyn Database>, settings: RunnerSettings) -> RunnerResult<Self> {
        db.ensure_tracking_table().await?;
        log::debug!(
            "Connected to {} (tracking table {})",
            db.db_type(),
            db.tracking_table()
        );
        Ok(Self { db, settings })
    }

    /// Settings this runner was built with
    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Scan the migrations directory
    pub fn discover(&self) -> RunnerResult<Discovery> {
        Ok(discover_migrations(
            &self.settings.migrations_dir,
            &self.settings.release_version,
        )?)
    }

    /// Discover migrations and diff them against the tracking table
    pub async fn plan(&self) -> RunnerResult<Plan> {
        let discovery = self.discover()?;
        let applied = self.db.load_applied().await?;
        let diff = calculate_diff(&discovery.migrations, &applied);
        Ok(Plan { discovery, diff })
    }

    /// Read-only status view
    pub async fn status(&self) -> RunnerResult<StatusView> {
        let discovery = self.discover()?;
        let applied = self.db.load_applied().await?;
        Ok(StatusView::build(&discovery.migrations, &applied))
    }

    /// Apply every pending migration in order
    pub async fn up(&self, dry_run: bool) -> RunnerResult<UpReport> {
        let plan = self.plan().await?;
        for mismatch in &plan.diff.modified {
            log::warn!(
                "{} has been modified since it was applied; it will not be re-applied",
                mismatch.filename
            );
        }
        for migration in plan
            .diff
            .pending
            .iter()
            .filter(|m| m.controls_transaction())
        {
            log::warn!(
                "{} contains BEGIN/COMMIT/ROLLBACK; stepwise already wraps each file in a transaction",
                migration.filename
            );
        }

        let apply = self.apply_all(&plan.diff.pending, dry_run).await?;
        Ok(UpReport {
            modified: plan.diff.modified,
            skipped: plan.discovery.skipped,
            apply,
        })
    }

    /// Reversal file paired with `filename`, if present
    pub fn rollback_path(&self, filename: &str) -> Option<PathBuf> {
        find_rollback(&self.settings.rollbacks_dir, filename)
    }

    /// Run `script` and a tracking change in one transaction.
    ///
    /// Any failure rolls the transaction back before the error is returned.
    /// A script that commits or rolls back on its own is detected before the
    /// tracking change is made; whatever it already committed stays.
    pub(crate) async fn transact(
        &self,
        script: &str,
        step: TrackingStep<'_>,
    ) -> Result<(), StepFailure> {
        self.db.begin().await?;
        log::debug!("BEGIN");

        let result = match self.run_step(script, step).await {
            Ok(()) => self.db.commit().await.map_err(StepFailure::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                log::debug!("COMMIT");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.rollback().await {
                    log::debug!("ROLLBACK after failure reported: {}", rollback_err);
                } else {
                    log::debug!("ROLLBACK");
                }
                Err(e)
            }
        }
    }

    async fn run_step(&self, script: &str, step: TrackingStep<'_>) -> Result<(), StepFailure> {
        let txid = self.db.transaction_id().await?;
        self.db.execute_batch(script).await?;
        if self.db.transaction_id().await? != txid {
            log::debug!("Transaction {} was ended by the script", txid);
            return Err(StepFailure::TransactionEnded);
        }
        match step {
            TrackingStep::Record {
                migration_name,
                version,
                checksum,
            } => {
                self.db
                    .record_application(migration_name, version, checksum)
                    .await?
            }
            TrackingStep::Remove { migration_name } => {
                self.db.remove_application(migration_name).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
