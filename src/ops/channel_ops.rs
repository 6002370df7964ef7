use rusqlite::Connection;

use crate::db::channel_repo;
use crate::error::{SupError, SupResult};
use crate::model::{Channel, ChannelConfig, Id};
use crate::validation;

pub fn create_channel(conn: &Connection, name: &str, config: ChannelConfig) -> SupResult<Channel> {
    let valid_name = validation::non_blank(name, "name")?;
    validation::validate_config(&config)?;

    let channel = Channel::create(valid_name, config);
    channel_repo::insert(conn, &channel)?;
    Ok(channel)
}

fn find_channel(conn: &Connection, channel_id: Id<Channel>) -> SupResult<Channel> {
    channel_repo::find_by_id(conn, channel_id)?.ok_or_else(|| SupError::NotFound {
        entity_type: "Channel".into(),
        id: channel_id.to_string(),
    })
}

pub fn update_config(conn: &Connection, channel_id: Id<Channel>, config: ChannelConfig) -> SupResult<Channel> {
    validation::validate_config(&config)?;
    let mut channel = find_channel(conn, channel_id)?;

    channel_repo::update_config(conn, channel_id, &config)?;
    channel.config = config;
    Ok(channel)
}

/// Moves a channel to another IANA time zone.
pub fn set_timezone(conn: &Connection, channel_id: Id<Channel>, name: &str) -> SupResult<Channel> {
    let timezone = validation::time_zone(name)?;
    let mut channel = find_channel(conn, channel_id)?;

    channel.config.timezone = timezone;
    channel_repo::update_config(conn, channel_id, &channel.config)?;
    Ok(channel)
}
