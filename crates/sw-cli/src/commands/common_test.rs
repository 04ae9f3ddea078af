use super::*;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn global_for(root: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: root.display().to_string(),
        config: None,
        database: None,
        target: None,
    }
}

const TARGETS_YML: &str = r#"
database:
  path: dev.duckdb
targets:
  prod:
    database:
      path: /srv/prod.duckdb
"#;

#[test]
fn exit_code_displays_nothing() {
    assert_eq!(ExitCode(1).to_string(), "");
}

#[test]
#[serial]
fn database_path_defaults_under_project() {
    std::env::remove_var("SW_TARGET");
    let temp = TempDir::new().unwrap();
    let global = global_for(temp.path());
    let project = load_project(&global).unwrap();

    let path = resolve_database_path(&global, &project).unwrap();
    assert_eq!(
        path,
        temp.path().join("stepwise.duckdb").display().to_string()
    );
}

#[test]
#[serial]
fn database_flag_wins() {
    std::env::set_var("SW_TARGET", "prod");
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("stepwise.yml"), TARGETS_YML).unwrap();
    let mut global = global_for(temp.path());
    global.database = Some(":memory:".to_string());
    let project = load_project(&global).unwrap();

    let path = resolve_database_path(&global, &project).unwrap();
    std::env::remove_var("SW_TARGET");
    assert_eq!(path, ":memory:");
}

#[test]
#[serial]
fn target_from_env() {
    std::env::set_var("SW_TARGET", "prod");
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("stepwise.yml"), TARGETS_YML).unwrap();
    let global = global_for(temp.path());
    let project = load_project(&global).unwrap();

    let path = resolve_database_path(&global, &project).unwrap();
    std::env::remove_var("SW_TARGET");
    assert_eq!(path, "/srv/prod.duckdb");
}

#[test]
#[serial]
fn unknown_target_errors() {
    std::env::remove_var("SW_TARGET");
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("stepwise.yml"), TARGETS_YML).unwrap();
    let mut global = global_for(temp.path());
    global.target = Some("staging".to_string());
    let project = load_project(&global).unwrap();

    let err = resolve_database_path(&global, &project).unwrap_err();
    assert!(format!("{err:#}").contains("Target 'staging' not found"));
}

#[test]
fn missing_explicit_config_errors() {
    let temp = TempDir::new().unwrap();
    let mut global = global_for(temp.path());
    global.config = Some(temp.path().join("nope.yml").display().to_string());

    let err = load_project(&global).err().unwrap();
    assert!(format!("{err:#}").contains("Config file not found"));
}

#[tokio::test]
async fn open_runner_uses_configured_tracking_table() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("stepwise.yml"),
        "tracking_table: schema_history\n",
    )
    .unwrap();
    let db_path = temp.path().join("app.duckdb");
    let mut global = global_for(temp.path());
    global.database = Some(db_path.display().to_string());

    let runner = open_runner(&global).await.unwrap();
    drop(runner);

    let db = DuckDbBackend::from_path(&db_path).unwrap();
    assert!(db.relation_exists("schema_history").unwrap());
    assert!(!db.relation_exists("stepwise_migrations").unwrap());
}
