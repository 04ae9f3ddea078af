//! Configuration types and parsing for stepwise.yml

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Config file names looked up in the project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["stepwise.yml", "stepwise.yaml"];

/// Environment variable naming the target to use when `--target` is absent
pub const TARGET_ENV_VAR: &str = "SW_TARGET";

/// Special database path for an in-memory DuckDB database
pub const MEMORY_DB_PATH: &str = ":memory:";

/// Longest release tag the tracking table can hold
const MAX_RELEASE_VERSION_LEN: usize = 20;

static IDENT_RE: OnceLock<Regex> = OnceLock::new();
static RELEASE_RE: OnceLock<Regex> = OnceLock::new();

/// Project configuration from stepwise.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding forward migrations
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Directory holding reversal files paired by filename
    #[serde(default = "default_rollbacks_path")]
    pub rollbacks_path: String,

    /// Name of the tracking table, optionally schema-qualified
    #[serde(default = "default_tracking_table")]
    pub tracking_table: String,

    /// Release tag recorded with every applied migration
    #[serde(default = "default_release_version")]
    pub release_version: String,

    /// Number of body characters shown by `up --dry-run`
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_rollbacks_path() -> String {
    "migrations/rollbacks".to_string()
}

fn default_tracking_table() -> String {
    "stepwise_migrations".to_string()
}

fn default_release_version() -> String {
    "0.1.0".to_string()
}

fn default_preview_chars() -> usize {
    500
}

fn default_db_path() -> String {
    "stepwise.duckdb".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_path: default_migrations_path(),
            rollbacks_path: default_rollbacks_path(),
            tracking_table: default_tracking_table(),
            release_version: default_release_version(),
            preview_chars: default_preview_chars(),
            database: DatabaseConfig::default(),
            targets: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for stepwise.yml or stepwise.yaml; falls back to defaults when
    /// neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            Some(path) => Self::load(&path),
            None => {
                log::debug!("No config file in {}, using defaults", dir.display());
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        let ident = IDENT_RE.get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
                .expect("valid regex literal")
        });
        if !ident.is_match(&self.tracking_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "tracking_table '{}' must be a plain or schema-qualified SQL identifier",
                    self.tracking_table
                ),
            });
        }

        let release = RELEASE_RE
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9._+-]+$").expect("valid regex literal"));
        if !release.is_match(&self.release_version)
            || self.release_version.len() > MAX_RELEASE_VERSION_LEN
        {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "release_version '{}' must be 1-{} characters of letters, digits, '.', '_', '+', or '-'",
                    self.release_version, MAX_RELEASE_VERSION_LEN
                ),
            });
        }

        if self.preview_chars == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "preview_chars must be greater than zero".to_string(),
            });
        }

        if self.migrations_path.trim().is_empty() || self.rollbacks_path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_path and rollbacks_path cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get absolute migrations path relative to a project root
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_path)
    }

    /// Get absolute rollbacks path relative to a project root
    pub fn rollbacks_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.rollbacks_path)
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get database configuration, optionally applying target overrides
    ///
    /// If target is specified and exists, uses target's database config.
    /// Otherwise, uses the base database config.
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve target from CLI flag or SW_TARGET environment variable
    ///
    /// Priority: CLI flag > SW_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }
}

impl DatabaseConfig {
    /// Resolve the database path against the project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn resolved_path(&self, root: &Path) -> String {
        if self.path == MEMORY_DB_PATH || Path::new(&self.path).is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
