//! Transactional executor
//!
//! Applies migrations strictly in sequence order, one transaction per
//! migration. The first failure is rolled back and stops the run; earlier
//! commits stay in place.

use serde::Serialize;
use std::time::{Duration, Instant};

use sw_core::{AppliedMap, MigrationDefinition};

use crate::error::{RunnerError, RunnerResult};
use crate::runner::{MigrationRunner, StepFailure, TrackingStep};

/// A migration committed during this run
#[derive(Debug, Clone, Serialize)]
pub struct AppliedMigration {
    pub filename: String,
    pub checksum: String,
    /// Wall time from BEGIN to COMMIT
    pub duration: Duration,
}

/// What a dry run would execute
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPreview {
    pub filename: String,
    pub name: String,
    pub checksum: String,
    /// Leading characters of the body
    pub preview: String,
    /// Characters left out of `preview`
    pub remaining_chars: usize,
    /// Body appears to issue its own BEGIN/COMMIT/ROLLBACK
    pub controls_transaction: bool,
}

/// Result of `apply_all`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub dry_run: bool,
    pub applied: Vec<AppliedMigration>,
    pub previews: Vec<MigrationPreview>,
}

impl ApplyReport {
    /// True when nothing was applied or previewed
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.previews.is_empty()
    }
}

impl MigrationRunner {
    /// Apply `pending` in ascending sequence order.
    ///
    /// With `dry_run` set nothing is executed or recorded; the report holds a
    /// body preview per migration instead. Migrations that already have a
    /// tracking record are refused before any work starts.
    pub async fn apply_all(
        &self,
        pending: &[MigrationDefinition],
        dry_run: bool,
    ) -> RunnerResult<ApplyReport> {
        let mut ordered: Vec<&MigrationDefinition> = pending.iter().collect();
        ordered.sort_by(|a, b| {
            (a.sequence_number, &a.filename).cmp(&(b.sequence_number, &b.filename))
        });

        let applied = self.db.load_applied().await?;
        let already: Vec<String> = ordered
            .iter()
            .filter(|m| applied.contains_key(&m.filename))
            .map(|m| m.filename.clone())
            .collect();
        if !already.is_empty() {
            return Err(RunnerError::AlreadyApplied {
                migrations: already,
            });
        }

        let mut report = ApplyReport {
            dry_run,
            ..ApplyReport::default()
        };

        if dry_run {
            report.previews = ordered
                .iter()
                .map(|m| self.preview(m))
                .collect();
            return Ok(report);
        }

        for migration in ordered {
            log::info!("Applying migration {}", migration.filename);
            let started = Instant::now();

            let step = TrackingStep::Record {
                migration_name: &migration.filename,
                version: &migration.release_version,
                checksum: &migration.checksum,
            };
            match self.transact(&migration.body, step).await {
                Ok(()) => {}
                Err(StepFailure::Db(source)) => {
                    log::error!("Migration {} failed: {}", migration.filename, source);
                    let last_applied = report
                        .applied
                        .last()
                        .map(|a| a.filename.clone())
                        .or_else(|| latest_record(&applied));
                    return Err(RunnerError::MigrationFailed {
                        migration: migration.filename.clone(),
                        applied: report.applied.into_iter().map(|a| a.filename).collect(),
                        last_applied,
                        source,
                    });
                }
                Err(StepFailure::TransactionEnded) => {
                    log::error!(
                        "Migration {} ended the transaction itself; not recorded",
                        migration.filename
                    );
                    return Err(RunnerError::TransactionEnded {
                        migration: migration.filename.clone(),
                        applied: report.applied.into_iter().map(|a| a.filename).collect(),
                    });
                }
            }

            let duration = started.elapsed();
            log::info!(
                "Applied migration {} in {}ms",
                migration.filename,
                duration.as_millis()
            );
            report.applied.push(AppliedMigration {
                filename: migration.filename.clone(),
                checksum: migration.checksum.clone(),
                duration,
            });
        }

        Ok(report)
    }

    fn preview(&self, migration: &MigrationDefinition) -> MigrationPreview {
        let (preview, remaining_chars) = migration.preview(self.settings.preview_chars);
        MigrationPreview {
            filename: migration.filename.clone(),
            name: migration.name.clone(),
            checksum: migration.checksum.clone(),
            preview: preview.to_string(),
            remaining_chars,
            controls_transaction: migration.controls_transaction(),
        }
    }
}

/// Most recently applied record already in the database
fn latest_record(applied: &AppliedMap) -> Option<String> {
    applied
        .values()
        .max_by(|a, b| {
            (a.applied_at, &a.migration_name).cmp(&(b.applied_at, &b.migration_name))
        })
        .map(|r| r.migration_name.clone())
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
