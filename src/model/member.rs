use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;

/// A channel member who may be placed into groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: Id<Member>,
    pub name: String,
    /// Members sharing the same team are never grouped by the partitioner.
    pub team: Option<String>,
    pub enabled: bool,
    pub opted_in: bool,
    pub vacation_until: Option<DateTime<Utc>>,
}

impl Member {
    pub fn create(name: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            team: None,
            enabled: true,
            opted_in: true,
            vacation_until: None,
        }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn is_on_vacation(&self, as_of: DateTime<Utc>) -> bool {
        self.vacation_until.is_some_and(|until| until > as_of)
    }

    /// Enabled, opted in and not away.
    pub fn is_eligible(&self, as_of: DateTime<Utc>) -> bool {
        self.enabled && self.opted_in && !self.is_on_vacation(as_of)
    }

    pub fn shares_team_with(&self, other: &Member) -> bool {
        match (&self.team, &other.team) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
