//! Tracking table SQL
//!
//! Statements are built from a table name that config validation has already
//! restricted to a plain or `schema.table` identifier. Values are always
//! bound as parameters.

/// Default tracking table name
pub const DEFAULT_TRACKING_TABLE: &str = "stepwise_migrations";

/// Schema part of a qualified table name, if any
pub fn schema_of(table: &str) -> Option<&str> {
    table.rsplit_once('.').map(|(schema, _)| schema)
}

/// DDL creating the tracking table (and its schema when qualified)
pub fn create_table_sql(table: &str) -> String {
    let schema = schema_of(table)
        .map(|s| format!("CREATE SCHEMA IF NOT EXISTS {s};\n"))
        .unwrap_or_default();
    format!(
        "{schema}CREATE TABLE IF NOT EXISTS {table} (
    id             UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    version        VARCHAR(20) NOT NULL,
    migration_name VARCHAR(255) NOT NULL,
    applied_at     TIMESTAMP NOT NULL DEFAULT now(),
    checksum       VARCHAR(64),
    UNIQUE (version, migration_name)
);"
    )
}

/// Read all records, oldest first
pub fn select_applied_sql(table: &str) -> String {
    format!(
        "SELECT migration_name, version, epoch_ms(applied_at), checksum \
         FROM {table} ORDER BY applied_at, migration_name"
    )
}

/// Insert a record; params: version, migration_name, checksum
pub fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} (version, migration_name, checksum) VALUES (?, ?, ?) \
         ON CONFLICT (version, migration_name) DO NOTHING"
    )
}

/// Fill a missing checksum; params: checksum, migration_name
pub fn backfill_checksum_sql(table: &str) -> String {
    format!("UPDATE {table} SET checksum = ? WHERE migration_name = ? AND checksum IS NULL")
}

/// Delete all records for a migration; params: migration_name
pub fn delete_sql(table: &str) -> String {
    format!("DELETE FROM {table} WHERE migration_name = ?")
}

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tests;
