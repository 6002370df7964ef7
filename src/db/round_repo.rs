use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::{from_db_time, from_db_time_opt, group_repo, to_db_time};
use crate::error::SupResult;
use crate::model::{Channel, Id, Round, RoundCounts};

/// The set-once follow-up timestamps of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    Asked,
    AskedAgain,
    Reminded,
}

impl Stamp {
    fn column(&self) -> &'static str {
        match self {
            Stamp::Asked => "asked_at",
            Stamp::AskedAgain => "asked_again_at",
            Stamp::Reminded => "reminded_at",
        }
    }
}

/// Stores a round together with its groups.
pub fn insert(conn: &Connection, round: &Round) -> SupResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO rounds (id, channel_id, created_at, ran_at, asked_at, asked_again_at, reminded_at,
                             total_count, opted_in_count, opted_out_count, on_vacation_count, paired_count, missed_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            round.id.to_db(),
            round.channel_id.to_db(),
            to_db_time(round.created_at),
            round.ran_at.map(to_db_time),
            round.asked_at.map(to_db_time),
            round.asked_again_at.map(to_db_time),
            round.reminded_at.map(to_db_time),
            round.counts.total as i64,
            round.counts.opted_in as i64,
            round.counts.opted_out as i64,
            round.counts.on_vacation as i64,
            round.counts.paired as i64,
            round.counts.missed as i64,
        ],
    )?;

    for (position, group) in round.groups.iter().enumerate() {
        group_repo::insert(&tx, group, position)?;
    }

    tx.commit()?;
    Ok(())
}

/// Sets a follow-up timestamp only if it is still unset. Returns whether
/// this call set it.
pub fn stamp(conn: &Connection, round_id: Id<Round>, stamp: Stamp, at: DateTime<Utc>) -> SupResult<bool> {
    let sql = format!(
        "UPDATE rounds SET {column} = ?1 WHERE id = ?2 AND {column} IS NULL",
        column = stamp.column()
    );
    let changed = conn.execute(&sql, params![to_db_time(at), round_id.to_db()])?;
    Ok(changed == 1)
}

const ROUND_COLUMNS: &str = "id, channel_id, created_at, ran_at, asked_at, asked_again_at, reminded_at,
     total_count, opted_in_count, opted_out_count, on_vacation_count, paired_count, missed_count";

struct RoundRow {
    id: String,
    channel_id: String,
    created_at: String,
    ran_at: Option<String>,
    asked_at: Option<String>,
    asked_again_at: Option<String>,
    reminded_at: Option<String>,
    counts: [i64; 6],
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RoundRow> {
    Ok(RoundRow {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        created_at: row.get(2)?,
        ran_at: row.get(3)?,
        asked_at: row.get(4)?,
        asked_again_at: row.get(5)?,
        reminded_at: row.get(6)?,
        counts: [
            row.get(7)?,
            row.get(8)?,
            row.get(9)?,
            row.get(10)?,
            row.get(11)?,
            row.get(12)?,
        ],
    })
}

fn round_from_row(conn: &Connection, row: RoundRow) -> SupResult<Round> {
    let id = Id::from_db(&row.id)?;
    let [total, opted_in, opted_out, on_vacation, paired, missed] = row.counts.map(|c| c.max(0) as usize);
    Ok(Round {
        id,
        channel_id: Id::from_db(&row.channel_id)?,
        created_at: from_db_time(&row.created_at)?,
        ran_at: from_db_time_opt(row.ran_at)?,
        asked_at: from_db_time_opt(row.asked_at)?,
        asked_again_at: from_db_time_opt(row.asked_again_at)?,
        reminded_at: from_db_time_opt(row.reminded_at)?,
        counts: RoundCounts {
            total,
            opted_in,
            opted_out,
            on_vacation,
            paired,
            missed,
        },
        groups: group_repo::find_by_round(conn, id)?,
    })
}

pub fn find_by_id(conn: &Connection, id: Id<Round>) -> SupResult<Option<Round>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM rounds WHERE id = ?1", ROUND_COLUMNS))?;

    match stmt.query_row(params![id.to_db()], read_row) {
        Ok(row) => Ok(Some(round_from_row(conn, row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The most recently created round of a channel.
pub fn find_last_for_channel(conn: &Connection, channel_id: Id<Channel>) -> SupResult<Option<Round>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM rounds WHERE channel_id = ?1 ORDER BY created_at DESC LIMIT 1",
        ROUND_COLUMNS
    ))?;

    match stmt.query_row(params![channel_id.to_db()], read_row) {
        Ok(row) => Ok(Some(round_from_row(conn, row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All rounds of a channel, newest first.
pub fn find_by_channel(conn: &Connection, channel_id: Id<Channel>) -> SupResult<Vec<Round>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM rounds WHERE channel_id = ?1 ORDER BY created_at DESC",
        ROUND_COLUMNS
    ))?;

    let rows: Vec<RoundRow> = stmt
        .query_map(params![channel_id.to_db()], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(|row| round_from_row(conn, row)).collect()
}
