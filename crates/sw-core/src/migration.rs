//! Migration definitions and filename grammar.
//!
//! A migration file is named `{NNN}_{snake_case_name}.sql` where `NNN` is a
//! sequence number of at least three digits. The number orders migrations;
//! gaps are allowed but duplicates are not.

use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{CoreError, CoreResult};

static FILENAME_RE: OnceLock<Regex> = OnceLock::new();
static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn filename_regex() -> &'static Regex {
    FILENAME_RE.get_or_init(|| {
        Regex::new(r"^(\d{3,})_([a-z0-9][a-z0-9_]*)\.sql$").expect("valid regex literal")
    })
}

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_]*$").expect("valid regex literal"))
}

/// The two halves of a parsed migration filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFilename {
    /// Numeric prefix
    pub sequence_number: u64,

    /// Descriptive snake_case portion, without the extension
    pub name: String,
}

/// Parse `NNN_name.sql` into its sequence number and name.
///
/// Returns `None` for anything that does not match the grammar, including
/// prefixes shorter than three digits and prefixes too large for a `u64`.
pub fn parse_migration_filename(filename: &str) -> Option<MigrationFilename> {
    let caps = filename_regex().captures(filename)?;
    let sequence_number = caps[1].parse::<u64>().ok()?;
    Some(MigrationFilename {
        sequence_number,
        name: caps[2].to_string(),
    })
}

/// Check that `name` is usable as the descriptive part of a new migration.
pub fn validate_migration_name(name: &str) -> CoreResult<()> {
    if name_regex().is_match(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: "use lowercase letters, digits, and underscores (snake_case)".to_string(),
        })
    }
}

/// Check that `filename` is a well-formed migration filename (no path parts).
pub fn validate_migration_filename(filename: &str) -> CoreResult<MigrationFilename> {
    parse_migration_filename(filename).ok_or_else(|| CoreError::InvalidMigrationName {
        name: filename.to_string(),
        reason: "expected a migration filename such as 001_create_users.sql".to_string(),
    })
}

/// One migration file found on disk.
///
/// Rebuilt from the filesystem on every invocation; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationDefinition {
    /// File name, e.g. `001_add_source_url.sql`; the tracking key
    pub filename: String,

    /// Number parsed from the filename prefix
    pub sequence_number: u64,

    /// Descriptive portion of the filename
    pub name: String,

    /// Full file contents, executed verbatim
    #[serde(skip)]
    pub body: String,

    /// SHA-256 of the raw file bytes
    pub checksum: String,

    /// Release tag stored alongside the tracking record
    pub release_version: String,

    /// Location on disk
    pub path: PathBuf,
}

impl MigrationDefinition {
    /// Return up to `max_chars` characters of the body and the number of
    /// characters left out.
    pub fn preview(&self, max_chars: usize) -> (&str, usize) {
        match self.body.char_indices().nth(max_chars) {
            Some((cut, _)) => {
                let remaining = self.body[cut..].chars().count();
                (&self.body[..cut], remaining)
            }
            None => (&self.body, 0),
        }
    }

    /// Heuristic check for a statement that opens or ends a transaction.
    ///
    /// The runner owns the transaction around each file, so a file that
    /// issues its own BEGIN, COMMIT, or ROLLBACK breaks atomicity. Line
    /// comments are ignored; string literals are not parsed.
    pub fn controls_transaction(&self) -> bool {
        let code: String = self
            .body
            .lines()
            .map(|line| line.split("--").next().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n");

        code.split(';').any(|statement| {
            let mut words = statement.split_whitespace().map(str::to_ascii_uppercase);
            match words.next().as_deref() {
                Some("BEGIN" | "COMMIT" | "ROLLBACK" | "END" | "ABORT") => true,
                Some("START") => words.next().as_deref() == Some("TRANSACTION"),
                _ => false,
            }
        })
    }
}

/// Convert a snake_case name to space-separated Title Case.
pub(crate) fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
