//! Status view model
//!
//! A read-only snapshot of applied, pending, and modified migrations built
//! from discovery output and tracking records. Rendering never queries the
//! database itself.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::applied::AppliedMap;
use crate::diff::calculate_diff;
use crate::migration::MigrationDefinition;

const RULE_WIDTH: usize = 70;

/// Lifecycle state of one discovered migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MigrationState {
    /// Tracking record exists and checksum matches (or was never recorded)
    Applied { applied_at: DateTime<Utc> },
    /// No tracking record
    Pending,
    /// Tracking record exists but the file changed afterwards
    Modified {
        applied_at: DateTime<Utc>,
        recorded_checksum: String,
        current_checksum: String,
    },
}

/// One row of the status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// Migration filename
    pub filename: String,
    /// Sequence number from the filename
    pub sequence_number: u64,
    /// Current state
    #[serde(flatten)]
    pub state: MigrationState,
}

/// Counts and per-migration state for `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Discovered migrations
    pub total: usize,
    /// Discovered migrations with a tracking record
    pub applied: usize,
    /// Discovered migrations without a tracking record
    pub pending: usize,
    /// Entries in ascending sequence order
    pub migrations: Vec<StatusEntry>,
    /// Tracking records whose file is gone
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orphaned: Vec<String>,
}

impl StatusView {
    /// Build the view from discovered migrations and tracking records.
    pub fn build(discovered: &[MigrationDefinition], applied: &AppliedMap) -> Self {
        let diff = calculate_diff(discovered, applied);

        let migrations = discovered
            .iter()
            .map(|m| {
                let state = match applied.get(&m.filename) {
                    None => MigrationState::Pending,
                    Some(record) => match diff.modified.iter().find(|x| x.filename == m.filename) {
                        Some(mismatch) => MigrationState::Modified {
                            applied_at: record.applied_at,
                            recorded_checksum: mismatch.recorded.clone(),
                            current_checksum: mismatch.current.clone(),
                        },
                        None => MigrationState::Applied {
                            applied_at: record.applied_at,
                        },
                    },
                };
                StatusEntry {
                    filename: m.filename.clone(),
                    sequence_number: m.sequence_number,
                    state,
                }
            })
            .collect();

        Self {
            total: discovered.len(),
            applied: diff.applied.len(),
            pending: diff.pending.len(),
            migrations,
            orphaned: diff.orphaned,
        }
    }

    /// Entries that are modified
    pub fn modified(&self) -> impl Iterator<Item = &StatusEntry> {
        self.migrations
            .iter()
            .filter(|e| matches!(e.state, MigrationState::Modified { .. }))
    }

    /// Render the human-readable report.
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "MIGRATION STATUS");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);
        let _ = writeln!(out, "Total migrations: {}", self.total);
        let _ = writeln!(out, "Applied: {}", self.applied);
        let _ = writeln!(out, "Pending: {}", self.pending);

        if self.applied > 0 {
            let _ = writeln!(out);
            let _ = writeln!(out, "--- Applied Migrations ---");
            for entry in &self.migrations {
                match &entry.state {
                    MigrationState::Applied { applied_at }
                    | MigrationState::Modified { applied_at, .. } => {
                        let _ = writeln!(
                            out,
                            "  ✓ {} (applied {})",
                            entry.filename,
                            applied_at.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                    MigrationState::Pending => {}
                }
            }
        }

        if self.pending > 0 {
            let _ = writeln!(out);
            let _ = writeln!(out, "--- Pending Migrations ---");
            for entry in &self.migrations {
                if entry.state == MigrationState::Pending {
                    let _ = writeln!(out, "  ○ {}", entry.filename);
                }
            }
        }

        let mut modified = self.modified().peekable();
        if modified.peek().is_some() {
            let _ = writeln!(out);
            for entry in modified {
                if let MigrationState::Modified {
                    recorded_checksum,
                    current_checksum,
                    ..
                } = &entry.state
                {
                    let _ = writeln!(
                        out,
                        "  ⚠ {} has been modified since it was applied",
                        entry.filename
                    );
                    let _ = writeln!(out, "      recorded checksum: {recorded_checksum}");
                    let _ = writeln!(out, "      current checksum:  {current_checksum}");
                }
            }
        }

        if !self.orphaned.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "  ⚠ Applied migrations with no file on disk:");
            for name in &self.orphaned {
                let _ = writeln!(out, "      {name}");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        out
    }
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
