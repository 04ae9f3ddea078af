//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// stepwise - apply numbered SQL migrations in order, one transaction each
#[derive(Parser, Debug)]
#[command(name = "sw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// DuckDB database path (overrides config and target)
    #[arg(short, long, global = true, env = "SW_DATABASE")]
    pub database: Option<String>,

    /// Named target from the config file [env: SW_TARGET]
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show applied, pending, and modified migrations
    Status(StatusArgs),

    /// Apply all pending migrations in order
    Up(UpArgs),

    /// Roll back one applied migration using its reversal file
    Down(DownArgs),

    /// Create the next numbered migration file
    Create(CreateArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable report
    Text,
    /// JSON document
    Json,
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Show what would be applied without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Migration filename to roll back (e.g. 001_create_users.sql)
    pub migration: String,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// snake_case name for the new migration (e.g. add_user_preferences)
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
