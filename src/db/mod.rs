//! SQLite store for channels, rounds and their groups.

pub mod schema;
pub mod channel_repo;
pub mod round_repo;
pub mod group_repo;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{SupError, SupResult};

/// Fixed-width UTC timestamps so text ordering matches time ordering.
pub(crate) fn to_db_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn from_db_time(s: &str) -> SupResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SupError::Other(format!("Invalid timestamp: {}", e)))
}

pub(crate) fn from_db_time_opt(s: Option<String>) -> SupResult<Option<DateTime<Utc>>> {
    s.as_deref().map(from_db_time).transpose()
}
