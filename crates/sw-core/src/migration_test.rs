use super::*;

fn definition(body: &str) -> MigrationDefinition {
    MigrationDefinition {
        filename: "001_create_users.sql".to_string(),
        sequence_number: 1,
        name: "create_users".to_string(),
        body: body.to_string(),
        checksum: crate::compute_checksum(body.as_bytes()),
        release_version: "0.1.0".to_string(),
        path: PathBuf::from("migrations/001_create_users.sql"),
    }
}

#[test]
fn test_parse_valid_filename() {
    let parsed = parse_migration_filename("001_add_source_url.sql").unwrap();
    assert_eq!(parsed.sequence_number, 1);
    assert_eq!(parsed.name, "add_source_url");
}

#[test]
fn test_parse_long_prefix() {
    let parsed = parse_migration_filename("0012_add_user_preferences.sql").unwrap();
    assert_eq!(parsed.sequence_number, 12);

    let parsed = parse_migration_filename("20240101120000_baseline.sql").unwrap();
    assert_eq!(parsed.sequence_number, 20240101120000);
}

#[test]
fn test_parse_rejects_short_prefix() {
    assert!(parse_migration_filename("1_bad.sql").is_none());
    assert!(parse_migration_filename("01_bad.sql").is_none());
}

#[test]
fn test_parse_rejects_missing_prefix_or_extension() {
    assert!(parse_migration_filename("create_users.sql").is_none());
    assert!(parse_migration_filename("001_create_users").is_none());
    assert!(parse_migration_filename("001_create_users.sql.bak").is_none());
    assert!(parse_migration_filename("001_create_users.txt").is_none());
    assert!(parse_migration_filename("001_.sql").is_none());
}

#[test]
fn test_parse_rejects_non_snake_case() {
    assert!(parse_migration_filename("001_CreateUsers.sql").is_none());
    assert!(parse_migration_filename("001_create-users.sql").is_none());
    assert!(parse_migration_filename("001_create users.sql").is_none());
}

#[test]
fn test_parse_rejects_paths() {
    assert!(parse_migration_filename("../001_create_users.sql").is_none());
    assert!(parse_migration_filename("sub/001_create_users.sql").is_none());
}

#[test]
fn test_parse_rejects_overflowing_number() {
    assert!(parse_migration_filename("99999999999999999999999_huge.sql").is_none());
}

#[test]
fn test_validate_migration_name() {
    assert!(validate_migration_name("add_new_column").is_ok());
    assert!(validate_migration_name("v2_cleanup").is_ok());

    let err = validate_migration_name("Add New Column").unwrap_err();
    assert!(matches!(err, CoreError::InvalidMigrationName { .. }));
    assert!(validate_migration_name("").is_err());
    assert!(validate_migration_name("../escape").is_err());
}

#[test]
fn test_validate_migration_filename() {
    let parsed = validate_migration_filename("003_add_index.sql").unwrap();
    assert_eq!(parsed.sequence_number, 3);

    let err = validate_migration_filename("../../etc/passwd").unwrap_err();
    assert!(err.to_string().contains("E004"));
}

#[test]
fn test_preview_short_body_is_complete() {
    let def = definition("SELECT 1;");
    let (text, remaining) = def.preview(500);
    assert_eq!(text, "SELECT 1;");
    assert_eq!(remaining, 0);
}

#[test]
fn test_preview_truncates_and_counts_remaining() {
    let def = definition("abcdefghij");
    let (text, remaining) = def.preview(4);
    assert_eq!(text, "abcd");
    assert_eq!(remaining, 6);
}

#[test]
fn test_preview_respects_char_boundaries() {
    let def = definition("-- émoji ✓ check");
    let (text, remaining) = def.preview(9);
    assert_eq!(text, "-- émoji ");
    assert_eq!(remaining, "✓ check".chars().count());
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("add_new_column"), "Add New Column");
    assert_eq!(title_case("v2__cleanup"), "V2 Cleanup");
}

#[test]
fn test_plain_ddl_does_not_control_transaction() {
    let def = definition("CREATE TABLE users (id INT);\nINSERT INTO users VALUES (1);\n");
    assert!(!def.controls_transaction());
}

#[test]
fn test_commit_statement_controls_transaction() {
    assert!(definition("CREATE TABLE a (id INT);\nCOMMIT;\n").controls_transaction());
    assert!(definition("create table a (id int); commit;").controls_transaction());
    assert!(definition("BEGIN TRANSACTION;\nCREATE TABLE a (id INT);").controls_transaction());
    assert!(definition("START TRANSACTION;").controls_transaction());
    assert!(definition("CREATE TABLE a (id INT);\n  rollback\n").controls_transaction());
}

#[test]
fn test_commented_transaction_markers_are_ignored() {
    let def = definition(
        "-- BEGIN (transaction opened by stepwise)\nCREATE TABLE a (id INT);\n-- COMMIT\n",
    );
    assert!(!def.controls_transaction());
}

#[test]
fn test_keywords_inside_identifiers_are_ignored() {
    let def = definition("CREATE TABLE commits (id INT);\nCREATE TABLE start_times (id INT);");
    assert!(!def.controls_transaction());
}
