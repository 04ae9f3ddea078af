use super::*;
use std::fs;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_discover_sorts_by_sequence_number() {
    let temp = tempdir().unwrap();
    write(temp.path(), "010_third.sql", "SELECT 3;");
    write(temp.path(), "001_first.sql", "SELECT 1;");
    write(temp.path(), "003_second.sql", "SELECT 2;");

    let discovery = discover_migrations(temp.path(), "0.1.0").unwrap();
    let names: Vec<&str> = discovery
        .migrations
        .iter()
        .map(|m| m.filename.as_str())
        .collect();

    assert_eq!(names, vec!["001_first.sql", "003_second.sql", "010_third.sql"]);
    assert!(discovery.skipped.is_empty());
}

#[test]
fn test_numeric_not_lexical_ordering() {
    let temp = tempdir().unwrap();
    write(temp.path(), "1000_later.sql", "SELECT 2;");
    write(temp.path(), "999_earlier.sql", "SELECT 1;");

    let discovery = discover_migrations(temp.path(), "0.1.0").unwrap();
    assert_eq!(discovery.migrations[0].sequence_number, 999);
    assert_eq!(discovery.migrations[1].sequence_number, 1000);
    assert_eq!(discovery.max_sequence_number(), Some(1000));
}

#[test]
fn test_discover_populates_definition() {
    let temp = tempdir().unwrap();
    write(temp.path(), "001_create_table.sql", "CREATE TABLE t (id INT);");

    let discovery = discover_migrations(temp.path(), "1.2.3").unwrap();
    let m = &discovery.migrations[0];

    assert_eq!(m.filename, "001_create_table.sql");
    assert_eq!(m.sequence_number, 1);
    assert_eq!(m.name, "create_table");
    assert_eq!(m.body, "CREATE TABLE t (id INT);");
    assert_eq!(m.checksum, compute_checksum(b"CREATE TABLE t (id INT);"));
    assert_eq!(m.release_version, "1.2.3");
    assert_eq!(m.path, temp.path().join("001_create_table.sql"));
}

#[test]
fn test_invalid_filenames_are_skipped() {
    let temp = tempdir().unwrap();
    write(temp.path(), "001_create_table.sql", "SELECT 1;");
    write(temp.path(), "1_bad.sql", "SELECT 1;");
    write(temp.path(), "notes.md", "# notes");
    write(temp.path(), "002_missing_ext", "SELECT 1;");

    let discovery = discover_migrations(temp.path(), "0.1.0").unwrap();

    assert_eq!(discovery.migrations.len(), 1);
    let skipped: Vec<&str> = discovery
        .skipped
        .iter()
        .map(|s| s.filename.as_str())
        .collect();
    assert_eq!(skipped, vec!["002_missing_ext", "1_bad.sql", "notes.md"]);
    assert!(discovery
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::InvalidFilename));
}

#[test]
fn test_directories_and_dotfiles_are_ignored_silently() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("rollbacks")).unwrap();
    write(&temp.path().join("rollbacks"), "001_create_table.sql", "DROP TABLE t;");
    write(temp.path(), ".gitkeep", "");
    write(temp.path(), "001_create_table.sql", "CREATE TABLE t (id INT);");

    let discovery = discover_migrations(temp.path(), "0.1.0").unwrap();

    assert_eq!(discovery.migrations.len(), 1);
    assert!(discovery.skipped.is_empty());
}

#[test]
fn test_non_utf8_body_is_skipped() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("001_binary.sql"), [0xff, 0xfe, 0x00]).unwrap();

    let discovery = discover_migrations(temp.path(), "0.1.0").unwrap();

    assert!(discovery.migrations.is_empty());
    assert_eq!(discovery.skipped[0].reason, SkipReason::NotUtf8);
}

#[test]
fn test_duplicate_sequence_number_is_an_error() {
    let temp = tempdir().unwrap();
    write(temp.path(), "002_add_users.sql", "SELECT 1;");
    write(temp.path(), "002_add_orders.sql", "SELECT 2;");

    let err = discover_migrations(temp.path(), "0.1.0").unwrap_err();
    match err {
        CoreError::DuplicateSequence {
            number,
            first,
            second,
        } => {
            assert_eq!(number, 2);
            assert_eq!(first, "002_add_orders.sql");
            assert_eq!(second, "002_add_users.sql");
        }
        other => panic!("expected DuplicateSequence, got {other:?}"),
    }
}

#[test]
fn test_duplicate_with_different_padding() {
    let temp = tempdir().unwrap();
    write(temp.path(), "002_a.sql", "SELECT 1;");
    write(temp.path(), "0002_b.sql", "SELECT 2;");

    let err = discover_migrations(temp.path(), "0.1.0").unwrap_err();
    assert!(err.to_string().contains("E003"));
}

#[test]
fn test_missing_directory_is_empty() {
    let temp = tempdir().unwrap();
    let discovery = discover_migrations(&temp.path().join("nope"), "0.1.0").unwrap();
    assert!(discovery.migrations.is_empty());
    assert_eq!(discovery.max_sequence_number(), None);
}

#[test]
fn test_checksum_uses_raw_bytes() {
    let temp = tempdir().unwrap();
    write(temp.path(), "001_crlf.sql", "SELECT 1;\r\n");

    let discovery = discover_migrations(temp.path(), "0.1.0").unwrap();
    assert_eq!(
        discovery.migrations[0].checksum,
        compute_checksum(b"SELECT 1;\r\n")
    );
}

#[test]
fn test_find_rollback() {
    let temp = tempdir().unwrap();
    let rollbacks = temp.path().join("rollbacks");
    fs::create_dir_all(&rollbacks).unwrap();
    write(&rollbacks, "001_create_table.sql", "DROP TABLE t;");

    assert_eq!(
        find_rollback(&rollbacks, "001_create_table.sql"),
        Some(rollbacks.join("001_create_table.sql"))
    );
    assert_eq!(find_rollback(&rollbacks, "002_other.sql"), None);
    assert_eq!(find_rollback(&temp.path().join("missing"), "001_create_table.sql"), None);
}
