use rusqlite::{params, Connection};

use crate::error::{SupError, SupResult};
use crate::model::{Channel, ChannelConfig, Id};

pub fn insert(conn: &Connection, channel: &Channel) -> SupResult<()> {
    conn.execute(
        "INSERT INTO channels (id, name, config) VALUES (?1, ?2, ?3)",
        params![channel.id.to_db(), channel.name, channel.config.to_json()?],
    )?;
    Ok(())
}

pub fn update_config(conn: &Connection, channel_id: Id<Channel>, config: &ChannelConfig) -> SupResult<()> {
    let changed = conn.execute(
        "UPDATE channels SET config = ?1 WHERE id = ?2",
        params![config.to_json()?, channel_id.to_db()],
    )?;
    if changed == 0 {
        return Err(SupError::NotFound {
            entity_type: "Channel".into(),
            id: channel_id.to_string(),
        });
    }
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Channel>) -> SupResult<Option<Channel>> {
    let mut stmt = conn.prepare("SELECT id, name, config FROM channels WHERE id = ?1")?;

    let result = stmt.query_row(params![id.to_db()], |row| {
        let id_str: String = row.get(0)?;
        let name: String = row.get(1)?;
        let config: String = row.get(2)?;
        Ok((id_str, name, config))
    });

    match result {
        Ok((id_str, name, config)) => Ok(Some(Channel {
            id: Id::from_db(&id_str)?,
            name,
            config: serde_json::from_str(&config)?,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_all(conn: &Connection) -> SupResult<Vec<Channel>> {
    let mut stmt = conn.prepare("SELECT id, name, config FROM channels ORDER BY name")?;

    let rows: Vec<(String, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id_str, name, config)| {
            Ok(Channel {
                id: Id::from_db(&id_str)?,
                name,
                config: serde_json::from_str(&config)?,
            })
        })
        .collect()
}
