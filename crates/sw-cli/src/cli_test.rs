use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parse_up_dry_run() {
    let cli = Cli::try_parse_from(["sw", "up", "--dry-run"]).unwrap();
    match cli.command {
        Commands::Up(args) => assert!(args.dry_run),
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(cli.global.project_dir, ".");
}

#[test]
fn parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "sw",
        "status",
        "--output",
        "json",
        "--project-dir",
        "/srv/app",
        "--target",
        "prod",
    ])
    .unwrap();

    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, StatusOutput::Json),
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(cli.global.project_dir, "/srv/app");
    assert_eq!(cli.global.target.as_deref(), Some("prod"));
}

#[test]
fn down_requires_migration() {
    assert!(Cli::try_parse_from(["sw", "down"]).is_err());
}

#[test]
fn parse_create_name() {
    let cli = Cli::try_parse_from(["sw", "create", "add_users"]).unwrap();
    match cli.command {
        Commands::Create(args) => assert_eq!(args.name, "add_users"),
        other => panic!("unexpected command: {other:?}"),
    }
}
