use std::collections::{HashMap, HashSet};

use rusqlite::Connection;

use crate::db::round_repo;
use crate::error::SupResult;
use crate::model::{Channel, Group, Id, Member, Outcome, Round};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeStats {
    pub groups: usize,
    /// Distinct members across all groups.
    pub members_in_groups: usize,
    /// Groups per reported outcome. Outcomes nobody reported are absent.
    pub outcomes: HashMap<Outcome, usize>,
}

impl OutcomeStats {
    fn from_groups<'a>(groups: impl IntoIterator<Item = &'a Group>) -> Self {
        let mut stats = OutcomeStats::default();
        let mut members: HashSet<Id<Member>> = HashSet::new();

        for group in groups {
            stats.groups += 1;
            members.extend(group.member_ids.iter().copied());
            *stats.outcomes.entry(group.outcome).or_insert(0) += 1;
        }

        stats.members_in_groups = members.len();
        stats
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Groups where at least some members met.
    pub fn positive(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_positive())
            .map(|(_, count)| count)
            .sum()
    }

    /// Groups that reported anything at all.
    pub fn reported(&self) -> usize {
        self.outcomes.values().sum::<usize>() - self.count(Outcome::Unknown)
    }

    /// Share of groups as a whole percentage, rounded down. Zero when
    /// there are no groups.
    pub fn percent(&self, count: usize) -> usize {
        if self.groups == 0 {
            0
        } else {
            count * 100 / self.groups
        }
    }
}

pub fn round_stats(round: &Round) -> OutcomeStats {
    OutcomeStats::from_groups(&round.groups)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub rounds: usize,
    pub outcomes: OutcomeStats,
}

pub fn channel_stats(conn: &Connection, channel_id: Id<Channel>) -> SupResult<ChannelStats> {
    let rounds = round_repo::find_by_channel(conn, channel_id)?;
    Ok(ChannelStats {
        rounds: rounds.len(),
        outcomes: OutcomeStats::from_groups(rounds.iter().flat_map(|r| r.groups.iter())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn round_with(outcomes: &[Outcome]) -> Round {
        let now = Utc::now();
        let mut round = Round::create(Id::generate(), now);
        round.groups = outcomes
            .iter()
            .map(|outcome| {
                let mut group = Group::create(round.id, vec![Id::generate(), Id::generate()], now);
                group.outcome = *outcome;
                group
            })
            .collect();
        round
    }

    #[test]
    fn empty_round_has_zero_percentages() {
        let stats = round_stats(&round_with(&[]));
        assert_eq!(stats.groups, 0);
        assert_eq!(stats.percent(stats.positive()), 0);
        assert!(stats.outcomes.is_empty());
    }

    #[test]
    fn positive_and_reported_counts() {
        let stats = round_stats(&round_with(&[
            Outcome::All,
            Outcome::Unknown,
            Outcome::Unknown,
            Outcome::Unknown,
        ]));
        assert_eq!(stats.groups, 4);
        assert_eq!(stats.members_in_groups, 8);
        assert_eq!(stats.positive(), 1);
        assert_eq!(stats.reported(), 1);
        assert_eq!(stats.percent(stats.positive()), 25);
        assert_eq!(stats.count(Outcome::Unknown), 3);
        assert_eq!(stats.count(Outcome::Later), 0);
    }

    #[test]
    fn later_and_none_are_reported_but_not_positive() {
        let stats = round_with(&[Outcome::Later, Outcome::None, Outcome::Some]);
        let stats = round_stats(&stats);
        assert_eq!(stats.positive(), 1);
        assert_eq!(stats.reported(), 3);
        assert_eq!(stats.percent(stats.reported()), 100);
    }
}
