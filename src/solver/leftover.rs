use tracing::info;

use super::rules::GroupRules;
use crate::model::Member;

/// What happened to the members left over after partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leftover {
    Nothing,
    /// The single leftover joined the group at this index.
    Merged { group: usize },
    /// The leftovers formed one undersized group.
    Formed { size: usize },
    Unplaced { count: usize },
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub leftover: Leftover,
    pub unplaced: Vec<Member>,
}

/// Places the remainder (fewer than `group_size` members) when odd
/// groups are allowed. Only recency is checked here, not teams.
pub fn resolve(
    groups: &mut Vec<Vec<Member>>,
    remainder: Vec<Member>,
    group_size: usize,
    allow_odd: bool,
    rules: &GroupRules,
) -> Resolution {
    if remainder.is_empty() {
        return Resolution {
            leftover: Leftover::Nothing,
            unplaced: remainder,
        };
    }
    if !allow_odd {
        return unplaced(remainder);
    }

    if remainder.len() == 1 {
        let lone = &remainder[0];
        for (index, group) in groups.iter_mut().enumerate() {
            let fits = {
                let merged: Vec<&Member> = group.iter().chain(std::iter::once(lone)).collect();
                !rules.met_recently(&merged)
            };
            if fits {
                info!(member = %lone.name, group = index, "Adding leftover member to an existing group");
                group.push(lone.clone());
                return Resolution {
                    leftover: Leftover::Merged { group: index },
                    unplaced: Vec::new(),
                };
            }
        }
        info!(member = %lone.name, "No group could take the leftover member");
        return unplaced(remainder);
    }

    let refs: Vec<&Member> = remainder.iter().collect();
    if remainder.len() < group_size && !rules.met_recently(&refs) {
        let size = remainder.len();
        info!(size, "Grouping leftover members together");
        groups.push(remainder);
        return Resolution {
            leftover: Leftover::Formed { size },
            unplaced: Vec::new(),
        };
    }
    unplaced(remainder)
}

fn unplaced(remainder: Vec<Member>) -> Resolution {
    Resolution {
        leftover: Leftover::Unplaced {
            count: remainder.len(),
        },
        unplaced: remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryFact, Id, MeetingHistory};
    use chrono::{Duration, TimeZone, Utc};

    fn members(n: usize) -> Vec<Member> {
        (0..n).map(|i| Member::create(format!("m{}", i))).collect()
    }

    fn rules_with_meeting(ids: &[&Member]) -> GroupRules {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap();
        let fact = HistoryFact {
            round_id: Id::generate(),
            created_at: now - Duration::weeks(1),
            member_ids: ids.iter().map(|m| m.id).collect(),
            captain_id: None,
        };
        GroupRules::new(MeetingHistory::from_facts(&[fact], Id::generate(), now - Duration::weeks(12)))
    }

    #[test]
    fn empty_remainder_is_noop() {
        let mut groups = vec![members(3)];
        let res = resolve(&mut groups, Vec::new(), 3, true, &GroupRules::default());
        assert_eq!(res.leftover, Leftover::Nothing);
        assert_eq!(groups[0].len(), 3);
    }

    #[test]
    fn odd_disabled_leaves_everyone_unplaced() {
        let mut groups = vec![members(3)];
        let res = resolve(&mut groups, members(2), 3, false, &GroupRules::default());
        assert_eq!(res.leftover, Leftover::Unplaced { count: 2 });
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn single_leftover_joins_first_group() {
        let mut groups = vec![members(3), members(3)];
        let res = resolve(&mut groups, members(1), 3, true, &GroupRules::default());
        assert_eq!(res.leftover, Leftover::Merged { group: 0 });
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn single_leftover_skips_group_it_met() {
        let mut groups = vec![members(2), members(2)];
        let lone = Member::create("lone".into());
        let rules = rules_with_meeting(&[&lone, &groups[0][1]]);
        let res = resolve(&mut groups, vec![lone], 2, true, &rules);
        assert_eq!(res.leftover, Leftover::Merged { group: 1 });
    }

    #[test]
    fn single_leftover_without_groups_is_unplaced() {
        let mut groups = Vec::new();
        let res = resolve(&mut groups, members(1), 3, true, &GroupRules::default());
        assert_eq!(res.unplaced.len(), 1);
    }

    #[test]
    fn single_leftover_ignores_team_tags() {
        let mut groups = vec![vec![Member::create("a".into()).with_team("t"), Member::create("b".into())]];
        let lone = Member::create("c".into()).with_team("t");
        let res = resolve(&mut groups, vec![lone], 2, true, &GroupRules::default());
        assert_eq!(res.leftover, Leftover::Merged { group: 0 });
    }

    #[test]
    fn several_leftovers_form_undersized_group() {
        let mut groups = vec![members(4)];
        let res = resolve(&mut groups, members(3), 4, true, &GroupRules::default());
        assert_eq!(res.leftover, Leftover::Formed { size: 3 });
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn several_leftovers_who_met_stay_unplaced() {
        let mut groups = Vec::new();
        let rest = members(2);
        let rules = rules_with_meeting(&[&rest[0], &rest[1]]);
        let res = resolve(&mut groups, rest, 3, true, &rules);
        assert_eq!(res.leftover, Leftover::Unplaced { count: 2 });
        assert!(groups.is_empty());
    }
}
