//! Follow-up state machine for a round that has run.
//!
//! Each transition checks its own predicate and the set-once timestamp it
//! owns, so calling it again, or calling it early, does nothing. The
//! transitions return the groups to signal; delivering them is the
//! caller's job.

use chrono::{DateTime, Datelike, Duration, Utc};
use tracing::info;

use crate::model::{ChannelConfig, Group, Id, Outcome, Round};
use crate::notify::Signal;

/// Groups owed a signal after a transition fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub signal: Signal,
    pub group_ids: Vec<Id<Group>>,
}

fn after_local_time(config: &ChannelConfig, now: DateTime<Utc>) -> bool {
    now.with_timezone(&config.timezone).time() >= config.time_of_day
}

impl Round {
    /// A day has passed since the run, nobody has been asked or reminded
    /// yet, and it is past the channel's time of day.
    pub fn should_remind(&self, config: &ChannelConfig, now: DateTime<Utc>) -> bool {
        let Some(ran_at) = self.ran_at else {
            return false;
        };
        self.asked_at.is_none()
            && self.reminded_at.is_none()
            && now >= ran_at + Duration::hours(24)
            && after_local_time(config, now)
    }

    /// A day has passed since the run and it is the channel's follow-up
    /// day, past its time of day.
    pub fn should_ask(&self, config: &ChannelConfig, now: DateTime<Utc>) -> bool {
        let Some(ran_at) = self.ran_at else {
            return false;
        };
        self.asked_at.is_none()
            && now >= ran_at + Duration::hours(24)
            && now.with_timezone(&config.timezone).weekday() == config.followup_weekday
            && after_local_time(config, now)
    }

    /// Two days have passed since asking.
    pub fn should_ask_again(&self, now: DateTime<Utc>) -> bool {
        match (self.asked_at, self.asked_again_at) {
            (Some(asked_at), None) => now >= asked_at + Duration::hours(48),
            _ => false,
        }
    }

    pub fn remind(&mut self, config: &ChannelConfig, now: DateTime<Utc>) -> Option<FollowUp> {
        if !self.should_remind(config, now) {
            return None;
        }
        self.reminded_at = Some(now);
        info!(round = %self.id, groups = self.groups.len(), "Reminding groups");
        Some(self.follow_up(Signal::Remind, |_| true))
    }

    pub fn ask(&mut self, config: &ChannelConfig, now: DateTime<Utc>) -> Option<FollowUp> {
        if !self.should_ask(config, now) {
            return None;
        }
        self.asked_at = Some(now);
        info!(round = %self.id, groups = self.groups.len(), "Asking groups for outcomes");
        Some(self.follow_up(Signal::Ask, |_| true))
    }

    /// Only groups that answered "later" are asked again.
    pub fn ask_again(&mut self, now: DateTime<Utc>) -> Option<FollowUp> {
        if !self.should_ask_again(now) {
            return None;
        }
        self.asked_again_at = Some(now);
        let follow_up = self.follow_up(Signal::AskAgain, |g| g.outcome == Outcome::Later);
        info!(round = %self.id, groups = follow_up.group_ids.len(), "Asking again");
        Some(follow_up)
    }

    fn follow_up(&self, signal: Signal, include: impl Fn(&Group) -> bool) -> FollowUp {
        FollowUp {
            signal,
            group_ids: self.groups.iter().filter(|g| include(g)).map(|g| g.id).collect(),
        }
    }
}
