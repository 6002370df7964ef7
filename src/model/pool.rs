use chrono::{DateTime, Utc};

use super::channel::Channel;
use super::member::Member;
use crate::error::SupResult;

/// The members available to a round, plus the population counts the
/// summary is computed from.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    pub eligible: Vec<Member>,
    pub total: usize,
    pub opted_in: usize,
    pub opted_out: usize,
    pub on_vacation: usize,
}

impl CandidatePool {
    /// Builds the pool from every enabled member of a channel.
    pub fn from_members(members: Vec<Member>, as_of: DateTime<Utc>) -> Self {
        let mut pool = CandidatePool::default();
        for member in members.into_iter().filter(|m| m.enabled) {
            pool.total += 1;
            if !member.opted_in {
                pool.opted_out += 1;
                continue;
            }
            pool.opted_in += 1;
            if member.is_on_vacation(as_of) {
                pool.on_vacation += 1;
                continue;
            }
            pool.eligible.push(member);
        }
        pool
    }
}

/// Supplies the candidate pool for a channel, usually from a directory
/// kept in sync elsewhere.
pub trait CandidateProvider {
    fn candidate_pool(&self, channel: &Channel, as_of: DateTime<Utc>) -> SupResult<CandidatePool>;
}
