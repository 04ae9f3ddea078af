use super::*;

#[test]
fn test_schema_of() {
    assert_eq!(schema_of("stepwise_migrations"), None);
    assert_eq!(schema_of("ops.history"), Some("ops"));
}

#[test]
fn test_create_table_sql_unqualified() {
    let sql = create_table_sql(DEFAULT_TRACKING_TABLE);
    assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS stepwise_migrations"));
    assert!(!sql.contains("CREATE SCHEMA"));
    assert!(sql.contains("UNIQUE (version, migration_name)"));
    assert!(sql.contains("applied_at     TIMESTAMP NOT NULL DEFAULT now()"));
}

#[test]
fn test_create_table_sql_qualified() {
    let sql = create_table_sql("ops.history");
    assert!(sql.starts_with("CREATE SCHEMA IF NOT EXISTS ops;\n"));
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS ops.history"));
}

#[test]
fn test_insert_is_conflict_tolerant() {
    let sql = insert_sql("t");
    assert!(sql.contains("ON CONFLICT (version, migration_name) DO NOTHING"));
}
