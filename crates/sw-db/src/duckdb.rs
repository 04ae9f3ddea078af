//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::tracking;
use crate::traits::{DatabaseCore, DatabaseTracking, DatabaseTransaction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use sw_core::{AppliedMap, AppliedRecord};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    tracking_table: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self::with_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Use a tracking table other than the default
    pub fn with_tracking_table(mut self, table: impl Into<String>) -> Self {
        self.tracking_table = table.into();
        self
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            tracking_table: tracking::DEFAULT_TRACKING_TABLE.to_string(),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn tracking_error(&self, message: impl std::fmt::Display) -> DbError {
        DbError::TrackingError {
            table: self.tracking_table.clone(),
            message: message.to_string(),
        }
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn transaction_sync(&self, statement: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(statement)
            .map_err(|e| DbError::TransactionError(format!("{statement} failed: {e}")))
    }

    fn transaction_id_sync(&self) -> DbResult<u64> {
        let conn = self.lock()?;
        // Start timestamp of the current transaction; every autocommit query gets a new one.
        conn.query_row("SELECT txid_current()", [], |row| row.get(0))
            .map_err(|e| DbError::TransactionError(format!("txid_current() failed: {e}")))
    }

    fn load_applied_sync(&self) -> DbResult<AppliedMap> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&tracking::select_applied_sql(&self.tracking_table))
            .map_err(|e| self.tracking_error(e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(|e| self.tracking_error(e))?;

        let mut applied = AppliedMap::new();
        for row in rows {
            let (migration_name, version, applied_ms, checksum) =
                row.map_err(|e| self.tracking_error(e))?;
            let applied_at = DateTime::<Utc>::from_timestamp_millis(applied_ms).ok_or_else(|| {
                self.tracking_error(format!(
                    "applied_at out of range for {migration_name}: {applied_ms}"
                ))
            })?;
            let record = AppliedRecord {
                migration_name: migration_name.clone(),
                version,
                applied_at,
                checksum,
            };

            // Rows arrive oldest first. Keep the earliest, unless a later row
            // carries a checksum the earlier one lacks.
            let keep_existing = applied
                .get(&migration_name)
                .is_some_and(|existing| existing.checksum.is_some() || record.checksum.is_none());
            if !keep_existing {
                applied.insert(migration_name, record);
            }
        }

        log::debug!(
            "Loaded {} tracking records from {}",
            applied.len(),
            self.tracking_table
        );
        Ok(applied)
    }

    fn record_application_sync(
        &self,
        migration_name: &str,
        version: &str,
        checksum: &str,
    ) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute(
            &tracking::insert_sql(&self.tracking_table),
            duckdb::params![version, migration_name, checksum],
        )
        .map_err(|e| self.tracking_error(format!("insert {migration_name}: {e}")))?;
        conn.execute(
            &tracking::backfill_checksum_sql(&self.tracking_table),
            duckdb::params![checksum, migration_name],
        )
        .map_err(|e| self.tracking_error(format!("checksum {migration_name}: {e}")))?;
        Ok(())
    }

    fn remove_application_sync(&self, migration_name: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(
            &tracking::delete_sql(&self.tracking_table),
            duckdb::params![migration_name],
        )
        .map_err(|e| self.tracking_error(format!("delete {migration_name}: {e}")))
    }
}

#[async_trait]
impl DatabaseCore for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl DatabaseTransaction for DuckDbBackend {
    async fn begin(&self) -> DbResult<()> {
        self.transaction_sync("BEGIN TRANSACTION")
    }

    async fn commit(&self) -> DbResult<()> {
        self.transaction_sync("COMMIT")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.transaction_sync("ROLLBACK")
    }

    async fn transaction_id(&self) -> DbResult<u64> {
        self.transaction_id_sync()
    }
}

#[async_trait]
impl DatabaseTracking for DuckDbBackend {
    fn tracking_table(&self) -> &str {
        &self.tracking_table
    }

    async fn ensure_tracking_table(&self) -> DbResult<()> {
        log::debug!("Ensuring tracking table {}", self.tracking_table);
        self.execute_batch_sync(&tracking::create_table_sql(&self.tracking_table))
            .map_err(|e| self.tracking_error(e))
    }

    async fn load_applied(&self) -> DbResult<AppliedMap> {
        self.load_applied_sync()
    }

    async fn record_application(
        &self,
        migration_name: &str,
        version: &str,
        checksum: &str,
    ) -> DbResult<()> {
        self.record_application_sync(migration_name, version, checksum)
    }

    async fn remove_application(&self, migration_name: &str) -> DbResult<usize> {
        self.remove_application_sync(migration_name)
    }
}

/// Catalog lookups used to assert on database state in tests
#[cfg(any(test, feature = "testing"))]
impl DuckDbBackend {
    /// Check if a table or view exists (optionally `schema.name`)
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }

    /// Number of rows the query returns
    pub fn query_count(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", sql), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
