//! Status command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::open_runner;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let runner = open_runner(global).await?;
    let view = runner.status().await.context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Text => print!("{}", view.render()),
        StatusOutput::Json => {
            let json =
                serde_json::to_string_pretty(&view).context("Failed to serialize status")?;
            println!("{}", json);
        }
    }

    Ok(())
}
