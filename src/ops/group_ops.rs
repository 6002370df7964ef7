use rusqlite::Connection;
use tracing::info;

use crate::db::group_repo;
use crate::error::{SupError, SupResult};
use crate::model::{Group, Id, Outcome};

/// Records what a group reported about its meeting. A later answer
/// replaces an earlier one.
pub fn record_outcome(conn: &Connection, group_id: Id<Group>, outcome: Outcome) -> SupResult<Group> {
    let mut group = group_repo::find_by_id(conn, group_id)?.ok_or_else(|| SupError::NotFound {
        entity_type: "Group".into(),
        id: group_id.to_string(),
    })?;

    group_repo::set_outcome(conn, group_id, outcome)?;
    info!(group = %group_id, from = ?group.outcome, to = ?outcome, "Recorded outcome");
    group.outcome = outcome;
    Ok(group)
}
