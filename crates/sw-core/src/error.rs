//! Error types for sw-core

use thiserror::Error;

/// Core error type for stepwise
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Two migration files share a sequence number
    #[error("[E003] Duplicate migration number {number:03}: '{first}' and '{second}'")]
    DuplicateSequence {
        number: u64,
        first: String,
        second: String,
    },

    /// E004: Name is not a valid migration name or filename
    #[error("[E004] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// E005: Generated migration file would overwrite an existing one
    #[error("[E005] Migration file already exists: {path}")]
    MigrationExists { path: String },

    /// E006: IO error
    #[error("[E006] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E007: IO error with file path context
    #[error("[E007] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E008: YAML parse error
    #[error("[E008] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E009: No sequence number is left after the highest one on disk
    #[error("[E009] No migration number follows {after}; renumber the migrations directory")]
    SequenceExhausted { after: u64 },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
