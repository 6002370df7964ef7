use std::collections::HashSet;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sup::model::*;
use sup::solver::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap()
}

fn members(n: usize) -> Vec<Member> {
    (0..n).map(|i| Member::create(format!("member{}", i))).collect()
}

/// Rules where each listed group met `weeks_ago`, judged with a 12 week window.
fn rules_with_meetings(groups: &[Vec<Id<Member>>], weeks_ago: i64) -> GroupRules {
    let facts: Vec<HistoryFact> = groups
        .iter()
        .map(|ids| HistoryFact {
            round_id: Id::generate(),
            created_at: now() - Duration::weeks(weeks_ago),
            member_ids: ids.clone(),
            captain_id: None,
        })
        .collect();
    GroupRules::new(MeetingHistory::from_facts(&facts, Id::generate(), now() - Duration::weeks(12)))
}

fn assert_disjoint(groups: &[Vec<Member>]) {
    let mut seen = HashSet::new();
    for member in groups.iter().flatten() {
        assert!(seen.insert(member.id), "{} placed twice", member.name);
    }
}

fn run(candidates: &[Member], rules: &GroupRules, group_size: usize, allow_odd: bool, seed: u64) -> (Vec<Vec<Member>>, Resolution) {
    let partitioner = Partitioner::new(rules, group_size).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let partition = partitioner.partition(candidates, Deadline::never(), &mut rng);
    let mut groups = partition.groups;
    let resolution = resolve(&mut groups, partition.remainder, group_size, allow_odd, rules);
    (groups, resolution)
}

// ==========================================================================
// SCENARIOS
// ==========================================================================

#[test]
fn three_members_form_one_full_group() {
    let rules = GroupRules::default();
    let (groups, resolution) = run(&members(3), &rules, 3, true, 1);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(resolution.leftover, Leftover::Nothing);
    assert!(resolution.unplaced.is_empty());
}

#[test]
fn ten_members_merge_the_leftover_into_a_group() {
    let rules = GroupRules::default();
    let (groups, resolution) = run(&members(10), &rules, 3, true, 2);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 10);
    assert_eq!(groups.iter().filter(|g| g.len() == 4).count(), 1);
    assert_eq!(resolution.leftover, Leftover::Merged { group: 0 });
    assert_disjoint(&groups);
}

#[test]
fn ten_members_without_odd_groups_miss_one() {
    let rules = GroupRules::default();
    let (groups, resolution) = run(&members(10), &rules, 3, false, 2);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 9);
    assert_eq!(resolution.leftover, Leftover::Unplaced { count: 1 });
    assert_eq!(resolution.unplaced.len(), 1);
}

#[test]
fn recent_pair_is_never_grouped() {
    let pool = members(2);
    let rules = rules_with_meetings(&[vec![pool[0].id, pool[1].id]], 1);
    let (groups, resolution) = run(&pool, &rules, 2, true, 3);
    assert!(groups.is_empty());
    assert_eq!(resolution.leftover, Leftover::Unplaced { count: 2 });
}

#[test]
fn meetings_outside_the_window_are_ignored() {
    let pool = members(2);
    let rules = rules_with_meetings(&[vec![pool[0].id, pool[1].id]], 13);
    let (groups, _) = run(&pool, &rules, 2, true, 3);
    assert_eq!(groups.len(), 1);
}

// ==========================================================================
// CONSTRAINTS
// ==========================================================================

#[test]
fn full_groups_never_share_a_team() {
    let pool = vec![
        Member::create("a1".into()).with_team("a"),
        Member::create("a2".into()).with_team("a"),
        Member::create("a3".into()).with_team("a"),
        Member::create("b1".into()).with_team("b"),
        Member::create("b2".into()).with_team("b"),
        Member::create("b3".into()).with_team("b"),
    ];
    let rules = GroupRules::default();
    for seed in 0..10 {
        let (groups, resolution) = run(&pool, &rules, 2, true, seed);
        assert_eq!(groups.len(), 3);
        assert_eq!(resolution.leftover, Leftover::Nothing);
        for group in &groups {
            assert!(!group[0].shares_team_with(&group[1]));
        }
    }
}

#[test]
fn groups_respect_history_across_a_larger_pool() {
    let pool: Vec<Member> = (0..12)
        .map(|i| {
            let member = Member::create(format!("member{}", i));
            if i % 4 == 0 { member.with_team("platform") } else { member }
        })
        .collect();
    let id = |i: usize| pool[i].id;
    let rules = rules_with_meetings(
        &[
            vec![id(0), id(1), id(2)],
            vec![id(3), id(4), id(5)],
            vec![id(6), id(7)],
            vec![id(1), id(9), id(10)],
        ],
        2,
    );
    let partitioner = Partitioner::new(&rules, 3).unwrap();

    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let partition = partitioner.partition(&pool, Deadline::never(), &mut rng);
        assert!(!partition.groups.is_empty(), "seed {} formed nothing", seed);
        assert_disjoint(&partition.groups);
        for group in &partition.groups {
            assert_eq!(group.len(), 3);
            let refs: Vec<&Member> = group.iter().collect();
            assert!(rules.is_valid_group(&refs), "seed {} formed an invalid group", seed);
        }
        assert_eq!(partition.placed() + partition.remainder.len(), pool.len());
    }
}

#[test]
fn leftover_merge_ignores_teams_but_not_recency() {
    let pool = vec![
        Member::create("a1".into()).with_team("a"),
        Member::create("b1".into()).with_team("b"),
        Member::create("a2".into()).with_team("a"),
    ];
    // a2 met b1 recently, so it may not join {a1, b1}; a lone leftover
    // with nowhere to go stays unplaced.
    let rules = rules_with_meetings(&[vec![pool[1].id, pool[2].id]], 2);
    let mut groups = vec![vec![pool[0].clone(), pool[1].clone()]];
    let resolution = resolve(&mut groups, vec![pool[2].clone()], 2, true, &rules);
    assert_eq!(resolution.leftover, Leftover::Unplaced { count: 1 });

    // Without that meeting a2 joins despite sharing a team with a1.
    let rules = GroupRules::default();
    let mut groups = vec![vec![pool[0].clone(), pool[1].clone()]];
    let resolution = resolve(&mut groups, vec![pool[2].clone()], 2, true, &rules);
    assert_eq!(resolution.leftover, Leftover::Merged { group: 0 });
    assert_eq!(groups[0].len(), 3);
}

#[test]
fn two_leftovers_form_an_undersized_group() {
    let rules = GroupRules::default();
    let (groups, resolution) = run(&members(8), &rules, 3, true, 4);
    assert_eq!(groups.len(), 3);
    assert_eq!(resolution.leftover, Leftover::Formed { size: 2 });
    assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 8);
}

#[test]
fn every_member_placed_at_most_once_across_sizes() {
    let rules = GroupRules::default();
    for group_size in 2..=5 {
        for n in 0..=13 {
            let (groups, _) = run(&members(n), &rules, group_size, true, n as u64);
            assert_disjoint(&groups);
            assert!(groups.iter().all(|g| g.len() <= group_size + 1));
        }
    }
}

// ==========================================================================
// ATTEMPTS AND DEADLINE
// ==========================================================================

#[test]
fn chosen_partition_has_the_best_coverage() {
    let pool = vec![
        Member::create("a1".into()).with_team("a"),
        Member::create("a2".into()).with_team("a"),
        Member::create("a3".into()).with_team("a"),
        Member::create("a4".into()).with_team("a"),
        Member::create("b1".into()).with_team("b"),
        Member::create("c1".into()).with_team("c"),
    ];
    let rules = GroupRules::default();
    let partitioner = Partitioner::new(&rules, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let partition = partitioner.partition(&pool, Deadline::never(), &mut rng);
    assert!(!partition.coverage.is_empty());
    assert!(partition.coverage.len() <= 3);
    assert_eq!(partition.placed(), *partition.coverage.iter().max().unwrap());
    assert_eq!(partition.placed() + partition.remainder.len(), pool.len());
}

#[test]
fn single_attempt_runs_once() {
    let pool: Vec<Member> = (0..4)
        .map(|i| Member::create(format!("same{}", i)).with_team("same"))
        .collect();
    let rules = GroupRules::default();
    let partitioner = Partitioner::new(&rules, 2).unwrap().with_attempts(1).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let partition = partitioner.partition(&pool, Deadline::never(), &mut rng);
    assert_eq!(partition.coverage, vec![0]);
    assert_eq!(partition.remainder.len(), 4);
}

#[test]
fn unplaceable_pool_runs_every_attempt() {
    let pool: Vec<Member> = (0..4)
        .map(|i| Member::create(format!("same{}", i)).with_team("same"))
        .collect();
    let rules = GroupRules::default();
    let partitioner = Partitioner::new(&rules, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let partition = partitioner.partition(&pool, Deadline::never(), &mut rng);
    assert_eq!(partition.coverage, vec![0, 0, 0]);
    assert!(!partition.timed_out);
}

#[test]
fn zero_budget_times_out_without_groups() {
    let rules = GroupRules::default();
    let partitioner = Partitioner::new(&rules, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let partition = partitioner.partition(&members(9), Deadline::after(StdDuration::ZERO), &mut rng);
    assert!(partition.timed_out);
    assert_eq!(partition.coverage, vec![0]);
    assert_eq!(partition.remainder.len(), 9);
}

// ==========================================================================
// CAPTAINS
// ==========================================================================

#[test]
fn captain_prefers_members_never_captain() {
    let pool = members(3);
    let ids: Vec<Id<Member>> = pool.iter().map(|m| m.id).collect();
    let facts = vec![HistoryFact {
        round_id: Id::generate(),
        created_at: now() - Duration::weeks(2),
        member_ids: ids.clone(),
        captain_id: Some(ids[0]),
    }];
    let captains = CaptainHistory::from_facts(&facts);
    assert_eq!(choose_captain(&ids, &captains), Some(ids[1]));
}

#[test]
fn captain_is_least_recent_when_all_have_led() {
    let pool = members(2);
    let ids: Vec<Id<Member>> = pool.iter().map(|m| m.id).collect();
    let facts: Vec<HistoryFact> = [(ids[0], 1), (ids[1], 3)]
        .iter()
        .map(|(captain, weeks)| HistoryFact {
            round_id: Id::generate(),
            created_at: now() - Duration::weeks(*weeks),
            member_ids: ids.clone(),
            captain_id: Some(*captain),
        })
        .collect();
    let captains = CaptainHistory::from_facts(&facts);
    assert_eq!(choose_captain(&ids, &captains), Some(ids[1]));
    assert_eq!(choose_captain(&[], &captains), None);
}
