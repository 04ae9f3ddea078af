//! Tracking records read back from the database

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// One row of the tracking table.
///
/// Created only by a successful apply commit and removed only by a successful
/// rollback commit. The checksum is never updated once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedRecord {
    /// Filename of the migration that produced this record
    pub migration_name: String,

    /// Release tag the record was written with
    pub version: String,

    /// Commit time of the application
    pub applied_at: DateTime<Utc>,

    /// Checksum at application time; `None` when the row was written by the
    /// migration body itself and never completed by the runner
    pub checksum: Option<String>,
}

/// Applied records keyed by migration filename
pub type AppliedMap = HashMap<String, AppliedRecord>;
