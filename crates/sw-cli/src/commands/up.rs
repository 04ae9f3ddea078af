//! Up command implementation

use anyhow::Result;
use sw_runner::{ApplyReport, MigrationPreview};

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{open_runner, ExitCode};

/// Execute the up command
pub async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let runner = open_runner(global).await?;

    let report = match runner.up(args.dry_run).await {
        Ok(report) => report,
        Err(err) => {
            eprintln!("\n✗ {}", err);
            return Err(ExitCode(1).into());
        }
    };

    for mismatch in &report.modified {
        println!(
            "⚠ WARNING: {} has been modified since it was applied",
            mismatch.filename
        );
        println!("  Recorded checksum: {}", mismatch.recorded);
        println!("  Current checksum:  {}", mismatch.current);
        println!("  This migration was SKIPPED to prevent re-running modified SQL");
    }

    if report.apply.is_empty() {
        println!("\n✓ Database is up to date. No pending migrations.");
        return Ok(());
    }

    print_report(&report.apply, runner.settings().preview_chars);
    Ok(())
}

fn print_report(report: &ApplyReport, preview_chars: usize) {
    if report.dry_run {
        println!(
            "\n[DRY RUN MODE] Found {} pending migration(s)",
            report.previews.len()
        );
        for preview in &report.previews {
            print_preview(preview, preview_chars);
        }
        println!("\n[DRY RUN] Would apply {} migration(s)", report.previews.len());
        println!("Run without --dry-run to apply for real");
        return;
    }

    println!("\nApplied {} pending migration(s)", report.applied.len());
    for applied in &report.applied {
        let short = applied.checksum.get(..12).unwrap_or(applied.checksum.as_str());
        println!(
            "  ✓ {} ({}ms, checksum {})",
            applied.filename,
            applied.duration.as_millis(),
            short
        );
    }
    println!(
        "\n✓ Successfully applied {} migration(s)",
        report.applied.len()
    );
}

fn print_preview(preview: &MigrationPreview, preview_chars: usize) {
    println!("\n[DRY RUN] Applying: {}", preview.filename);
    println!("  Name: {}", preview.name);
    println!("  Checksum: {}", preview.checksum);
    if preview.controls_transaction {
        println!("  ⚠ WARNING: file issues its own BEGIN/COMMIT/ROLLBACK");
        println!("  stepwise already runs each file in one transaction; this file will fail or be left unrecorded");
    }
    println!("\n--- SQL Preview (first {} chars) ---", preview_chars);
    println!("{}", preview.preview);
    if preview.remaining_chars > 0 {
        println!("... ({} more characters)", preview.remaining_chars);
    }
    println!("--- End Preview ---");
}
