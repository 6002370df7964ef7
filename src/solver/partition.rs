//! Backtracking search that splits a shuffled candidate list into
//! disjoint groups of a fixed size.
//!
//! Each attempt builds groups one at a time. Inside a group the search is
//! a depth-first walk over candidate indices with an explicit choice-point
//! stack: an incompatible candidate is skipped, a dead end pops the most
//! recent choice and resumes after it. Once a group is accepted it is
//! fixed; when no further group can be assembled the attempt keeps what
//! it has. Later attempts only draw from members no earlier attempt
//! placed, so each attempt explores a disjoint part of the pool.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::rules::GroupRules;
use crate::error::SupResult;
use crate::model::{Id, Member};
use crate::validation;

/// Wall-clock limit checked cooperatively by the search.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    pub fn never() -> Self {
        Self { at: None }
    }

    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// The chosen attempt's groups and whoever it could not place.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub groups: Vec<Vec<Member>>,
    pub remainder: Vec<Member>,
    /// Members placed by each attempt, in the order the attempts ran.
    pub coverage: Vec<usize>,
    pub timed_out: bool,
}

impl Partition {
    pub fn placed(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

enum Search {
    Found(Vec<usize>),
    Exhausted,
    TimedOut,
}

struct Attempt {
    groups: Vec<Vec<Member>>,
    timed_out: bool,
}

impl Attempt {
    fn placed(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

pub struct Partitioner<'a> {
    rules: &'a GroupRules,
    group_size: usize,
    attempts: usize,
}

impl<'a> Partitioner<'a> {
    pub fn new(rules: &'a GroupRules, group_size: usize) -> SupResult<Self> {
        validation::at_least(group_size as i64, 2, "group_size")?;
        Ok(Self {
            rules,
            group_size,
            attempts: 3,
        })
    }

    pub fn with_attempts(mut self, attempts: usize) -> SupResult<Self> {
        validation::at_least(attempts as i64, 1, "attempts")?;
        self.attempts = attempts;
        Ok(self)
    }

    /// Runs up to `attempts` shuffled searches and keeps the one that placed
    /// the most members. Each attempt skips everyone placed by an earlier
    /// one. Stops early once an attempt places everyone or the deadline
    /// passes.
    pub fn partition<R: Rng + ?Sized>(
        &self,
        candidates: &[Member],
        deadline: Deadline,
        rng: &mut R,
    ) -> Partition {
        let mut placed_before: HashSet<Id<Member>> = HashSet::new();
        let mut best: Option<Attempt> = None;
        let mut coverage = Vec::with_capacity(self.attempts);
        let mut timed_out = false;

        for number in 1..=self.attempts {
            let mut pool: Vec<Member> = candidates
                .iter()
                .filter(|m| !placed_before.contains(&m.id))
                .cloned()
                .collect();
            pool.shuffle(rng);

            let attempt = self.attempt(pool, &deadline);
            let placed = attempt.placed();
            coverage.push(placed);
            timed_out |= attempt.timed_out;
            debug!(
                attempt = number,
                groups = attempt.groups.len(),
                placed,
                candidates = candidates.len(),
                "Partition attempt finished"
            );

            placed_before.extend(attempt.groups.iter().flatten().map(|m| m.id));
            if best.as_ref().map_or(true, |b| placed > b.placed()) {
                best = Some(attempt);
            }
            if placed == candidates.len() {
                break;
            }
            if timed_out {
                info!(attempt = number, "Partition deadline passed, keeping groups found so far");
                break;
            }
        }

        let groups = best.map(|b| b.groups).unwrap_or_default();
        let grouped: HashSet<Id<Member>> = groups.iter().flatten().map(|m| m.id).collect();
        let remainder = candidates
            .iter()
            .filter(|m| !grouped.contains(&m.id))
            .cloned()
            .collect();
        Partition {
            groups,
            remainder,
            coverage,
            timed_out,
        }
    }

    fn attempt(&self, mut pool: Vec<Member>, deadline: &Deadline) -> Attempt {
        let mut groups = Vec::new();
        let mut timed_out = false;

        while pool.len() >= self.group_size {
            match self.find_group(&pool, deadline) {
                Search::Found(picked) => {
                    let group: Vec<Member> = picked.iter().map(|&i| pool[i].clone()).collect();
                    pool = pool
                        .into_iter()
                        .enumerate()
                        .filter(|(i, _)| !picked.contains(i))
                        .map(|(_, m)| m)
                        .collect();
                    groups.push(group);
                }
                Search::Exhausted => break,
                Search::TimedOut => {
                    timed_out = true;
                    break;
                }
            }
        }

        Attempt { groups, timed_out }
    }

    /// Depth-first search for one admissible group. `stack` holds the
    /// indices chosen so far, `next` the first untried index at the current
    /// choice point.
    fn find_group(&self, pool: &[Member], deadline: &Deadline) -> Search {
        let k = self.group_size;
        let n = pool.len();
        let mut stack: Vec<usize> = Vec::with_capacity(k);
        let mut next = 0;

        loop {
            if deadline.expired() {
                return Search::TimedOut;
            }

            if stack.len() == k {
                return Search::Found(stack);
            } else if next + (k - stack.len()) <= n {
                let candidate = next;
                next += 1;
                if stack
                    .iter()
                    .all(|&i| self.rules.compatible(&pool[i], &pool[candidate]))
                {
                    stack.push(candidate);
                }
                continue;
            }

            match stack.pop() {
                Some(last) => next = last + 1,
                None => return Search::Exhausted,
            }
        }
    }
}
