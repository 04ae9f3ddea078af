use super::*;
use crate::applied::AppliedRecord;
use crate::checksum::compute_checksum;
use chrono::Utc;
use std::path::PathBuf;

fn migration(number: u64, name: &str, body: &str) -> MigrationDefinition {
    let filename = format!("{:03}_{}.sql", number, name);
    MigrationDefinition {
        path: PathBuf::from("migrations").join(&filename),
        filename,
        sequence_number: number,
        name: name.to_string(),
        body: body.to_string(),
        checksum: compute_checksum(body.as_bytes()),
        release_version: "0.1.0".to_string(),
    }
}

fn record(name: &str, checksum: Option<&str>) -> AppliedRecord {
    AppliedRecord {
        migration_name: name.to_string(),
        version: "0.1.0".to_string(),
        applied_at: Utc::now(),
        checksum: checksum.map(String::from),
    }
}

#[test]
fn test_all_pending_when_nothing_applied() {
    let discovered = vec![migration(1, "a", "SELECT 1;"), migration(3, "b", "SELECT 3;")];
    let diff = calculate_diff(&discovered, &AppliedMap::new());

    assert_eq!(diff.pending.len(), 2);
    assert_eq!(diff.pending[0].sequence_number, 1);
    assert_eq!(diff.pending[1].sequence_number, 3);
    assert!(diff.applied.is_empty());
}

#[test]
fn test_applied_are_excluded_from_pending() {
    let discovered = vec![
        migration(1, "a", "SELECT 1;"),
        migration(2, "b", "SELECT 2;"),
        migration(3, "c", "SELECT 3;"),
    ];
    let mut applied = AppliedMap::new();
    let checksum = discovered[1].checksum.clone();
    applied.insert(
        "002_b.sql".to_string(),
        record("002_b.sql", Some(&checksum)),
    );

    let diff = calculate_diff(&discovered, &applied);
    let pending: Vec<&str> = diff.pending.iter().map(|m| m.filename.as_str()).collect();

    assert_eq!(pending, vec!["001_a.sql", "003_c.sql"]);
    assert_eq!(diff.applied.len(), 1);
    assert!(diff.modified.is_empty());
}

#[test]
fn test_modified_is_flagged_and_not_pending() {
    let discovered = vec![migration(1, "a", "SELECT 1; -- edited")];
    let mut applied = AppliedMap::new();
    let original = compute_checksum(b"SELECT 1;");
    applied.insert("001_a.sql".to_string(), record("001_a.sql", Some(&original)));

    let diff = calculate_diff(&discovered, &applied);

    assert!(diff.pending.is_empty());
    assert_eq!(diff.modified.len(), 1);
    assert_eq!(diff.modified[0].recorded, original);
    assert_eq!(diff.modified[0].current, discovered[0].checksum);
    assert_eq!(diff.modified[0].filename, "001_a.sql");
}

#[test]
fn test_missing_recorded_checksum_is_not_modified() {
    let discovered = vec![migration(1, "a", "SELECT 1;")];
    let mut applied = AppliedMap::new();
    applied.insert("001_a.sql".to_string(), record("001_a.sql", None));

    let diff = calculate_diff(&discovered, &applied);

    assert!(diff.pending.is_empty());
    assert!(diff.modified.is_empty());
}

#[test]
fn test_orphaned_records() {
    let discovered = vec![migration(1, "a", "SELECT 1;")];
    let mut applied = AppliedMap::new();
    applied.insert("005_gone.sql".to_string(), record("005_gone.sql", None));
    applied.insert("004_also_gone.sql".to_string(), record("004_also_gone.sql", None));

    let diff = calculate_diff(&discovered, &applied);

    assert_eq!(diff.orphaned, vec!["004_also_gone.sql", "005_gone.sql"]);
    assert_eq!(diff.pending.len(), 1);
}
