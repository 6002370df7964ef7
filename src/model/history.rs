use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::member::Member;
use super::round::Round;

/// A group from an earlier round, as seen by the constraint checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFact {
    pub round_id: Id<Round>,
    pub created_at: DateTime<Utc>,
    pub member_ids: Vec<Id<Member>>,
    pub captain_id: Option<Id<Member>>,
}

type Pair = (Id<Member>, Id<Member>);

fn pair(a: Id<Member>, b: Id<Member>) -> Pair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every pair of members who shared a group after a cutoff, excluding
/// the round being built.
#[derive(Debug, Clone, Default)]
pub struct MeetingHistory {
    pairs: HashSet<Pair>,
}

impl MeetingHistory {
    pub fn from_facts(facts: &[HistoryFact], current_round: Id<Round>, since: DateTime<Utc>) -> Self {
        let mut pairs = HashSet::new();
        for fact in facts
            .iter()
            .filter(|f| f.round_id != current_round && f.created_at > since)
        {
            for (i, a) in fact.member_ids.iter().enumerate() {
                for b in &fact.member_ids[i + 1..] {
                    pairs.insert(pair(*a, *b));
                }
            }
        }
        Self { pairs }
    }

    pub fn met_recently(&self, a: Id<Member>, b: Id<Member>) -> bool {
        a != b && self.pairs.contains(&pair(a, b))
    }

    /// Whether any two of the given members met recently.
    pub fn any_met_recently(&self, members: &[Id<Member>]) -> bool {
        members
            .iter()
            .enumerate()
            .any(|(i, a)| members[i + 1..].iter().any(|b| self.met_recently(*a, *b)))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// When each member last captained a group.
#[derive(Debug, Clone, Default)]
pub struct CaptainHistory {
    last_captained: HashMap<Id<Member>, DateTime<Utc>>,
}

impl CaptainHistory {
    pub fn from_facts(facts: &[HistoryFact]) -> Self {
        let mut last_captained: HashMap<Id<Member>, DateTime<Utc>> = HashMap::new();
        for fact in facts {
            if let Some(captain) = fact.captain_id {
                let entry = last_captained.entry(captain).or_insert(fact.created_at);
                if fact.created_at > *entry {
                    *entry = fact.created_at;
                }
            }
        }
        Self { last_captained }
    }

    pub fn last_captained(&self, member_id: Id<Member>) -> Option<DateTime<Utc>> {
        self.last_captained.get(&member_id).copied()
    }
}
