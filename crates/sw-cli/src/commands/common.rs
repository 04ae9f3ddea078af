//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sw_core::Config;
use sw_db::{Database, DuckDbBackend};
use sw_runner::{MigrationRunner, RunnerSettings};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the database is closed cleanly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty: the command has already printed its own message.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Config plus the project root it was resolved against
pub(crate) struct ProjectContext {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the config named by `--config`, or the one in the project directory.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<ProjectContext> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)).context("Failed to load configuration file")?,
        None => Config::load_from_dir(&root).context("Failed to load project configuration")?,
    };
    Ok(ProjectContext { root, config })
}

/// Database path by priority: `--database`/`SW_DATABASE`, target, base config.
pub(crate) fn resolve_database_path(global: &GlobalArgs, project: &ProjectContext) -> Result<String> {
    if let Some(path) = &global.database {
        return Ok(path.clone());
    }
    let target = Config::resolve_target(global.target.as_deref());
    let database = project
        .config
        .get_database_config(target.as_deref())
        .context("Failed to resolve database target")?;
    Ok(database.resolved_path(&project.root))
}

/// Open the database and build the runner for this invocation.
pub(crate) async fn open_runner(global: &GlobalArgs) -> Result<MigrationRunner> {
    let project = load_project(global)?;
    let db_path = resolve_database_path(global, &project)?;
    log::debug!("Using database {}", db_path);

    let backend = DuckDbBackend::new(&db_path)
        .with_context(|| format!("Failed to connect to database {}", db_path))?
        .with_tracking_table(project.config.tracking_table.clone());
    let db: Arc<dyn Database> = Arc::new(backend);

    let settings = RunnerSettings::from_config(&project.config, &project.root);
    MigrationRunner::connect(db, settings)
        .await
        .context("Failed to prepare tracking table")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
