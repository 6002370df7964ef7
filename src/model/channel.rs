use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::ids::Id;
use crate::error::SupResult;
use crate::validation;

/// A channel whose members are grouped into rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: Id<Channel>,
    pub name: String,
    pub config: ChannelConfig,
}

impl Channel {
    pub fn create(name: String, config: ChannelConfig) -> Self {
        Self {
            id: Id::generate(),
            name,
            config,
        }
    }
}

/// Grouping and schedule settings for one channel.
///
/// Every field has a default, so a JSON document only needs the fields
/// that differ from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Members per group.
    pub group_size: usize,
    /// Place the leftover members that cannot fill a whole group.
    pub allow_odd: bool,
    /// Two members who met within this many weeks are not grouped again.
    pub recency_weeks: u32,
    pub round_weekday: Weekday,
    pub followup_weekday: Weekday,
    /// Earliest local time-of-day for rounds, reminders and follow-ups.
    pub time_of_day: NaiveTime,
    pub timezone: Tz,
    /// A new round starts at most once every this many weeks.
    pub every_n_weeks: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            group_size: 3,
            allow_odd: true,
            recency_weeks: 12,
            round_weekday: Weekday::Mon,
            followup_weekday: Weekday::Thu,
            time_of_day: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            timezone: chrono_tz::America::New_York,
            every_n_weeks: 1,
        }
    }
}

impl ChannelConfig {
    /// Parse and validate a config document.
    pub fn from_json(json: &str) -> SupResult<Self> {
        let config: ChannelConfig = serde_json::from_str(json)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    pub fn to_json(&self) -> SupResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
