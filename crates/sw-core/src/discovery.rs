//! Migration discovery
//!
//! Scans a single directory (non-recursively) for migration files and builds
//! the ordered catalog used by every command. Malformed filenames are skipped
//! with a warning; duplicate sequence numbers abort discovery.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::checksum::compute_checksum;
use crate::error::{CoreError, CoreResult};
use crate::migration::{parse_migration_filename, MigrationDefinition};

/// Why a file in the migrations directory was not turned into a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Name does not match `NNN_snake_case_name.sql`
    InvalidFilename,
    /// File name or contents are not valid UTF-8
    NotUtf8,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidFilename => {
                write!(f, "filename does not match NNN_snake_case_name.sql")
            }
            SkipReason::NotUtf8 => write!(f, "not valid UTF-8"),
        }
    }
}

/// A file that discovery ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// File name as found on disk (lossy if not UTF-8)
    pub filename: String,
    /// Reason it was skipped
    pub reason: SkipReason,
}

/// Result of scanning a migrations directory
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Valid migrations, ascending by sequence number
    pub migrations: Vec<MigrationDefinition>,
    /// Files that were skipped with a warning
    pub skipped: Vec<SkippedFile>,
}

impl Discovery {
    /// Highest sequence number on disk, if any
    pub fn max_sequence_number(&self) -> Option<u64> {
        self.migrations.iter().map(|m| m.sequence_number).max()
    }
}

/// Discover all migrations in `dir`.
///
/// A missing directory yields an empty catalog and a warning rather than an
/// error, so `status` works on a fresh project.
pub fn discover_migrations(dir: &Path, release_version: &str) -> CoreResult<Discovery> {
    let mut discovery = Discovery::default();

    if !dir.exists() {
        log::warn!("Migrations directory not found: {}", dir.display());
        return Ok(discovery);
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            continue;
        }

        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            let lossy = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            skip(&mut discovery, lossy, SkipReason::NotUtf8);
            continue;
        };

        if filename.starts_with('.') {
            continue;
        }

        let Some(parsed) = parse_migration_filename(filename) else {
            skip(&mut discovery, filename.to_string(), SkipReason::InvalidFilename);
            continue;
        };

        let bytes = std::fs::read(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let checksum = compute_checksum(&bytes);
        let body = match String::from_utf8(bytes) {
            Ok(body) => body,
            Err(_) => {
                skip(&mut discovery, filename.to_string(), SkipReason::NotUtf8);
                continue;
            }
        };

        discovery.migrations.push(MigrationDefinition {
            filename: filename.to_string(),
            sequence_number: parsed.sequence_number,
            name: parsed.name,
            body,
            checksum,
            release_version: release_version.to_string(),
            path,
        });
    }

    discovery
        .migrations
        .sort_by(|a, b| (a.sequence_number, &a.filename).cmp(&(b.sequence_number, &b.filename)));

    if let Some(pair) = discovery
        .migrations
        .windows(2)
        .find(|pair| pair[0].sequence_number == pair[1].sequence_number)
    {
        return Err(CoreError::DuplicateSequence {
            number: pair[0].sequence_number,
            first: pair[0].filename.clone(),
            second: pair[1].filename.clone(),
        });
    }

    Ok(discovery)
}

fn skip(discovery: &mut Discovery, filename: String, reason: SkipReason) {
    log::warn!("Skipping invalid migration file {}: {}", filename, reason);
    discovery.skipped.push(SkippedFile { filename, reason });
}

/// Path of the reversal file paired with `filename`, if one exists.
///
/// Reversals are paired purely by identical filename inside `rollbacks_dir`.
pub fn find_rollback(rollbacks_dir: &Path, filename: &str) -> Option<PathBuf> {
    let path = rollbacks_dir.join(filename);
    path.is_file().then_some(path)
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
