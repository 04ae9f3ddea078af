//! Down command implementation

use anyhow::Result;
use sw_runner::RunnerError;

use crate::cli::{DownArgs, GlobalArgs};
use crate::commands::common::{open_runner, ExitCode};

/// Execute the down command
pub async fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    let runner = open_runner(global).await?;

    println!("\nRolling back: {}", args.migration);
    match runner.rollback(&args.migration).await {
        Ok(rolled_back) => {
            println!(
                "  ✓ Rolled back successfully ({}ms)",
                rolled_back.duration.as_millis()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("  ✗ {}", err);
            if matches!(err, RunnerError::RollbackUnavailable { .. }) {
                eprintln!(
                    "Rollbacks must be created manually in: {}",
                    runner.settings().rollbacks_dir.display()
                );
            }
            Err(ExitCode(1).into())
        }
    }
}
