use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::group::Group;
use super::ids::Id;

/// Population and placement tallies recorded when a round runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCounts {
    pub total: usize,
    pub opted_in: usize,
    pub opted_out: usize,
    pub on_vacation: usize,
    pub paired: usize,
    pub missed: usize,
}

/// One grouping cycle for a channel.
///
/// Timestamps are set once and never cleared; see `lifecycle` for the
/// transitions that set the follow-up ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: Id<Round>,
    pub channel_id: Id<Channel>,
    pub created_at: DateTime<Utc>,
    pub ran_at: Option<DateTime<Utc>>,
    pub asked_at: Option<DateTime<Utc>>,
    pub asked_again_at: Option<DateTime<Utc>>,
    pub reminded_at: Option<DateTime<Utc>>,
    pub counts: RoundCounts,
    pub groups: Vec<Group>,
}

impl Round {
    pub fn create(channel_id: Id<Channel>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            channel_id,
            created_at,
            ran_at: None,
            asked_at: None,
            asked_again_at: None,
            reminded_at: None,
            counts: RoundCounts::default(),
            groups: Vec::new(),
        }
    }

    pub fn group(&self, id: Id<Group>) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: Id<Group>) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }
}
