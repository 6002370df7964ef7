use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::member::Member;
use super::round::Round;

/// What a group reported back about meeting up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Unknown,
    All,
    Some,
    Later,
    None,
}

impl Outcome {
    pub const ALL: &'static [Outcome] = &[
        Outcome::Unknown,
        Outcome::All,
        Outcome::Some,
        Outcome::Later,
        Outcome::None,
    ];

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "unknown" => Some(Outcome::Unknown),
            "all" => Some(Outcome::All),
            "some" => Some(Outcome::Some),
            "later" => Some(Outcome::Later),
            "none" => Some(Outcome::None),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Outcome::Unknown => "unknown",
            Outcome::All => "all",
            Outcome::Some => "some",
            Outcome::Later => "later",
            Outcome::None => "none",
        }
    }

    /// At least part of the group met.
    pub fn is_positive(&self) -> bool {
        matches!(self, Outcome::All | Outcome::Some)
    }
}

/// One group formed in a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Id<Group>,
    pub round_id: Id<Round>,
    pub member_ids: Vec<Id<Member>>,
    pub captain_id: Option<Id<Member>>,
    pub outcome: Outcome,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn create(round_id: Id<Round>, member_ids: Vec<Id<Member>>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Id::generate(),
            round_id,
            member_ids,
            captain_id: None,
            outcome: Outcome::Unknown,
            created_at,
        }
    }

    pub fn contains(&self, member_id: Id<Member>) -> bool {
        self.member_ids.contains(&member_id)
    }
}
