//! Rollback executor

use serde::Serialize;
use std::time::{Duration, Instant};

use sw_core::migration::validate_migration_filename;
use sw_core::CoreError;

use crate::error::{RunnerError, RunnerResult};
use crate::runner::{MigrationRunner, StepFailure, TrackingStep};

/// A migration whose reversal was committed
#[derive(Debug, Clone, Serialize)]
pub struct RolledBack {
    pub filename: String,
    pub duration: Duration,
}

impl MigrationRunner {
    /// Roll back one applied migration using its paired reversal file.
    ///
    /// Later-numbered migrations are not checked; rolling back in reverse
    /// order is up to the caller.
    pub async fn rollback(&self, filename: &str) -> RunnerResult<RolledBack> {
        validate_migration_filename(filename)?;

        let path = self
            .rollback_path(filename)
            .ok_or_else(|| RunnerError::RollbackUnavailable {
                migration: filename.to_string(),
                path: self
                    .settings
                    .rollbacks_dir
                    .join(filename)
                    .display()
                    .to_string(),
            })?;

        let applied = self.db.load_applied().await?;
        if !applied.contains_key(filename) {
            return Err(RunnerError::NotApplied {
                migration: filename.to_string(),
            });
        }

        let body = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        log::info!("Rolling back migration {}", filename);
        let started = Instant::now();
        self.transact(
            &body,
            TrackingStep::Remove {
                migration_name: filename,
            },
        )
        .await
        .map_err(|failure| match failure {
            StepFailure::Db(source) => {
                log::error!("Rollback of {} failed: {}", filename, source);
                RunnerError::RollbackFailed {
                    migration: filename.to_string(),
                    source,
                }
            }
            StepFailure::TransactionEnded => {
                log::error!("Rollback of {} ended the transaction itself", filename);
                RunnerError::TransactionEnded {
                    migration: filename.to_string(),
                    applied: Vec::new(),
                }
            }
        })?;

        let duration = started.elapsed();
        log::info!("Rolled back {} in {}ms", filename, duration.as_millis());
        Ok(RolledBack {
            filename: filename.to_string(),
            duration,
        })
    }
}

#[cfg(test)]
#[path = "rollback_test.rs"]
mod tests;
