//! Applied vs. discovered comparison
//!
//! Splits the discovered catalog into pending, applied, and modified sets.
//! Modified migrations are applied ones whose file changed after the fact;
//! they are reported and never re-applied.

use serde::Serialize;

use crate::applied::AppliedMap;
use crate::migration::MigrationDefinition;

/// An applied migration whose on-disk content no longer matches the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecksumMismatch {
    /// Migration filename
    pub filename: String,
    /// Checksum frozen in the tracking table
    pub recorded: String,
    /// Checksum of the file as it is now
    pub current: String,
}

/// Outcome of comparing discovered migrations to applied records
#[derive(Debug, Clone, Default)]
pub struct MigrationDiff {
    /// Migrations with no tracking record, ascending by sequence number
    pub pending: Vec<MigrationDefinition>,

    /// Discovered migrations that have a tracking record (modified included)
    pub applied: Vec<MigrationDefinition>,

    /// Applied migrations whose checksum drifted
    pub modified: Vec<ChecksumMismatch>,

    /// Tracking records with no matching file on disk, sorted by name
    pub orphaned: Vec<String>,
}

/// Compute the pending set and drift flags.
///
/// `discovered` is expected in ascending sequence order (as returned by
/// discovery); the output preserves it.
pub fn calculate_diff(discovered: &[MigrationDefinition], applied: &AppliedMap) -> MigrationDiff {
    let mut diff = MigrationDiff::default();

    for migration in discovered {
        match applied.get(&migration.filename) {
            None => diff.pending.push(migration.clone()),
            Some(record) => {
                if let Some(recorded) = &record.checksum {
                    if *recorded != migration.checksum {
                        diff.modified.push(ChecksumMismatch {
                            filename: migration.filename.clone(),
                            recorded: recorded.clone(),
                            current: migration.checksum.clone(),
                        });
                    }
                }
                diff.applied.push(migration.clone());
            }
        }
    }

    diff.orphaned = applied
        .keys()
        .filter(|name| !discovered.iter().any(|m| &m.filename == *name))
        .cloned()
        .collect();
    diff.orphaned.sort();

    diff
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
