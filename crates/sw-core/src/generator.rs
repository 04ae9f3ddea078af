//! Migration file generation for `create`

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::discovery::discover_migrations;
use crate::error::{CoreError, CoreResult};
use crate::migration::{title_case, validate_migration_name};

/// First sequence number used in an empty directory
const FIRST_SEQUENCE_NUMBER: u64 = 1;

/// Create the next numbered migration file in `dir` and return its path.
///
/// The number is one past the highest number on disk. The file is created
/// with create-new semantics so an existing file is never overwritten.
pub fn create_migration(
    dir: &Path,
    name: &str,
    release_version: &str,
    tracking_table: &str,
) -> CoreResult<PathBuf> {
    validate_migration_name(name)?;

    std::fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let discovery = discover_migrations(dir, release_version)?;
    let next = match discovery.max_sequence_number() {
        None => FIRST_SEQUENCE_NUMBER,
        Some(max) => max
            .checked_add(1)
            .ok_or(CoreError::SequenceExhausted { after: max })?,
    };

    let filename = format!("{:03}_{}.sql", next, name);
    let path = dir.join(&filename);
    let content = render_template(&filename, name, release_version, tracking_table);

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => CoreError::MigrationExists {
                path: path.display().to_string(),
            },
            _ => CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            },
        })?;
    file.write_all(content.as_bytes())
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

    log::info!("Created migration {}", path.display());
    Ok(path)
}

/// Skeleton written into a new migration file.
///
/// The runner wraps the whole file in its own transaction, so the template
/// marks the transactional region with comments instead of BEGIN/COMMIT.
pub fn render_template(
    filename: &str,
    name: &str,
    release_version: &str,
    tracking_table: &str,
) -> String {
    format!(
        "-- {filename}
-- =====================================================
-- Description: {description}
-- =====================================================

-- BEGIN (transaction opened by stepwise)

-- Your migration SQL here
-- Example: Add a new column
-- ALTER TABLE your_table
-- ADD COLUMN your_column TEXT;

-- Record migration application for tracking
INSERT INTO {tracking_table} (version, migration_name)
VALUES ('{release_version}', '{filename}')
ON CONFLICT (version, migration_name) DO NOTHING;

-- COMMIT (transaction committed by stepwise)
",
        description = title_case(name),
    )
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
