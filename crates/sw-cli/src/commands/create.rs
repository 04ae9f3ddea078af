//! Create command implementation

use anyhow::Result;
use sw_core::create_migration;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::{load_project, ExitCode};

/// Execute the create command. Does not open the database.
pub async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let config = &project.config;

    match create_migration(
        &config.migrations_path_absolute(&project.root),
        &args.name,
        &config.release_version,
        &config.tracking_table,
    ) {
        Ok(path) => {
            println!("\n✓ Created migration: {}", path.display());
            println!("\nEdit the file and run: sw up");
            Ok(())
        }
        Err(err) => {
            eprintln!("✗ {}", err);
            Err(ExitCode(1).into())
        }
    }
}
