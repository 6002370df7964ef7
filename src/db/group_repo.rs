use std::collections::HashMap;

use rusqlite::{params, Connection};

use super::{from_db_time, to_db_time};
use crate::error::{SupError, SupResult};
use crate::model::{Channel, Group, HistoryFact, Id, Member, Outcome, Round};

pub fn insert(conn: &Connection, group: &Group, position: usize) -> SupResult<()> {
    conn.execute(
        "INSERT INTO round_groups (id, round_id, position, captain_id, outcome, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            group.id.to_db(),
            group.round_id.to_db(),
            position as i64,
            group.captain_id.map(|id| id.to_db()),
            group.outcome.to_db_str(),
            to_db_time(group.created_at),
        ],
    )?;

    for (index, member_id) in group.member_ids.iter().enumerate() {
        conn.execute(
            "INSERT INTO round_group_members (group_id, member_id, position) VALUES (?1, ?2, ?3)",
            params![group.id.to_db(), member_id.to_db(), index as i64],
        )?;
    }

    Ok(())
}

pub fn set_outcome(conn: &Connection, group_id: Id<Group>, outcome: Outcome) -> SupResult<()> {
    let changed = conn.execute(
        "UPDATE round_groups SET outcome = ?1 WHERE id = ?2",
        params![outcome.to_db_str(), group_id.to_db()],
    )?;
    if changed == 0 {
        return Err(SupError::NotFound {
            entity_type: "Group".into(),
            id: group_id.to_string(),
        });
    }
    Ok(())
}

type GroupRow = (String, String, Option<String>, String, String);

fn group_from_row(conn: &Connection, row: GroupRow) -> SupResult<Group> {
    let (id_str, round_id, captain_id, outcome, created_at) = row;
    let id = Id::from_db(&id_str)?;
    Ok(Group {
        id,
        round_id: Id::from_db(&round_id)?,
        member_ids: find_member_ids(conn, id)?,
        captain_id: captain_id.as_deref().map(Id::from_db).transpose()?,
        outcome: Outcome::from_db_str(&outcome)
            .ok_or_else(|| SupError::Other(format!("Unknown outcome: {}", outcome)))?,
        created_at: from_db_time(&created_at)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<Group>) -> SupResult<Option<Group>> {
    let mut stmt = conn.prepare(
        "SELECT id, round_id, captain_id, outcome, created_at FROM round_groups WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_db()], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
    });

    match result {
        Ok(row) => Ok(Some(group_from_row(conn, row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Groups of a round in creation order.
pub fn find_by_round(conn: &Connection, round_id: Id<Round>) -> SupResult<Vec<Group>> {
    let mut stmt = conn.prepare(
        "SELECT id, round_id, captain_id, outcome, created_at FROM round_groups
         WHERE round_id = ?1 ORDER BY position",
    )?;

    let rows: Vec<GroupRow> = stmt
        .query_map(params![round_id.to_db()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|row| group_from_row(conn, row)).collect()
}

/// Every group a channel has had, as history facts for the constraint
/// checks and captain selection.
pub fn history_for_channel(conn: &Connection, channel_id: Id<Channel>) -> SupResult<Vec<HistoryFact>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.round_id, g.captain_id, g.created_at, m.member_id
         FROM round_groups g
         JOIN rounds r ON g.round_id = r.id
         JOIN round_group_members m ON m.group_id = g.id
         WHERE r.channel_id = ?1
         ORDER BY g.created_at, g.id, m.position",
    )?;

    let rows: Vec<(String, String, Option<String>, String, String)> = stmt
        .query_map(params![channel_id.to_db()], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut facts: Vec<HistoryFact> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (group_id, round_id, captain_id, created_at, member_id) in rows {
        let member_id: Id<Member> = Id::from_db(&member_id)?;
        if let Some(&i) = index.get(&group_id) {
            facts[i].member_ids.push(member_id);
            continue;
        }
        index.insert(group_id, facts.len());
        facts.push(HistoryFact {
            round_id: Id::from_db(&round_id)?,
            created_at: from_db_time(&created_at)?,
            member_ids: vec![member_id],
            captain_id: captain_id.as_deref().map(Id::from_db).transpose()?,
        });
    }

    Ok(facts)
}

fn find_member_ids(conn: &Connection, group_id: Id<Group>) -> SupResult<Vec<Id<Member>>> {
    let mut stmt = conn.prepare(
        "SELECT member_id FROM round_group_members WHERE group_id = ?1 ORDER BY position",
    )?;

    let ids = stmt
        .query_map(params![group_id.to_db()], |row| {
            let id_str: String = row.get(0)?;
            Ok(id_str)
        })?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|s| Id::from_db(&s))
        .collect::<SupResult<Vec<_>>>()?;

    Ok(ids)
}
