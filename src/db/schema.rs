use rusqlite::Connection;

use crate::error::SupResult;

/// Initialize the database schema. Creates all tables if they don't exist.
pub fn initialize(conn: &Connection) -> SupResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS channels (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            config TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS rounds (
            id TEXT PRIMARY KEY NOT NULL,
            channel_id TEXT NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            ran_at TEXT,
            asked_at TEXT,
            asked_again_at TEXT,
            reminded_at TEXT,
            total_count INTEGER NOT NULL DEFAULT 0,
            opted_in_count INTEGER NOT NULL DEFAULT 0,
            opted_out_count INTEGER NOT NULL DEFAULT 0,
            on_vacation_count INTEGER NOT NULL DEFAULT 0,
            paired_count INTEGER NOT NULL DEFAULT 0,
            missed_count INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS rounds_by_channel ON rounds (channel_id, created_at);

        CREATE TABLE IF NOT EXISTS round_groups (
            id TEXT PRIMARY KEY NOT NULL,
            round_id TEXT NOT NULL REFERENCES rounds(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            captain_id TEXT,
            outcome TEXT NOT NULL DEFAULT 'unknown',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS round_group_members (
            group_id TEXT NOT NULL REFERENCES round_groups(id) ON DELETE CASCADE,
            member_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            PRIMARY KEY (group_id, member_id)
        );

        CREATE INDEX IF NOT EXISTS round_group_members_by_member ON round_group_members (member_id);

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
