use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::warn;

use crate::db::round_repo::{self, Stamp};
use crate::error::SupResult;
use crate::lifecycle::FollowUp;
use crate::model::{Channel, Group, Round};
use crate::notify::{Notifier, Signal};

/// Sends `signal` to each group. A failed group is logged and skipped.
/// Returns how many groups were notified.
pub fn deliver<'a>(notifier: &dyn Notifier, signal: Signal, groups: impl Iterator<Item = &'a Group>) -> usize {
    let mut delivered = 0;
    for group in groups {
        match notifier.notify_group(signal, group) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(?signal, group = %group.id, error = %e, "Failed to notify group"),
        }
    }
    delivered
}

/// Applies a transition to the channel's latest round. The stored
/// timestamp is claimed before any group hears about it, so a transition
/// another caller already applied sends nothing.
fn apply(
    conn: &Connection,
    channel: &Channel,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
    stamp: Stamp,
    transition: impl FnOnce(&mut Round) -> Option<FollowUp>,
) -> SupResult<Option<Round>> {
    let Some(mut round) = round_repo::find_last_for_channel(conn, channel.id)? else {
        return Ok(None);
    };
    let Some(follow_up) = transition(&mut round) else {
        return Ok(None);
    };
    if !round_repo::stamp(conn, round.id, stamp, now)? {
        return Ok(None);
    }

    let groups = round
        .groups
        .iter()
        .filter(|g| follow_up.group_ids.contains(&g.id));
    deliver(notifier, follow_up.signal, groups);
    Ok(Some(round))
}

pub fn remind(conn: &Connection, channel: &Channel, notifier: &dyn Notifier, now: DateTime<Utc>) -> SupResult<Option<Round>> {
    apply(conn, channel, notifier, now, Stamp::Reminded, |round| {
        round.remind(&channel.config, now)
    })
}

pub fn ask(conn: &Connection, channel: &Channel, notifier: &dyn Notifier, now: DateTime<Utc>) -> SupResult<Option<Round>> {
    apply(conn, channel, notifier, now, Stamp::Asked, |round| {
        round.ask(&channel.config, now)
    })
}

pub fn ask_again(conn: &Connection, channel: &Channel, notifier: &dyn Notifier, now: DateTime<Utc>) -> SupResult<Option<Round>> {
    apply(conn, channel, notifier, now, Stamp::AskedAgain, |round| round.ask_again(now))
}
