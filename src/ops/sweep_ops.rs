//! Periodic drivers. One sweep creates rounds that are due; the other
//! moves each channel's latest round through its follow-ups. A failing
//! channel is logged and counted and never stops the others.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use super::followup_ops;
use super::round_ops::{self, RoundReport};
use crate::db::{channel_repo, round_repo};
use crate::error::SupResult;
use crate::model::{CandidateProvider, Channel, Round, SolverSettings};
use crate::notify::Notifier;
use crate::queries::schedule_queries;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub channels: usize,
    pub rounds_created: usize,
    pub reminded: usize,
    pub asked: usize,
    pub asked_again: usize,
    pub failures: usize,
}

fn create_if_due<R: Rng + ?Sized>(
    conn: &Connection,
    channel: &Channel,
    provider: &dyn CandidateProvider,
    notifier: &dyn Notifier,
    settings: &SolverSettings,
    now: DateTime<Utc>,
    rng: &mut R,
) -> SupResult<Option<RoundReport>> {
    let last = round_repo::find_last_for_channel(conn, channel.id)?;
    if !schedule_queries::is_round_due(&channel.config, last.map(|r| r.created_at), now) {
        debug!(channel = %channel.name, "No round due");
        return Ok(None);
    }

    let pool = provider.candidate_pool(channel, now)?;
    round_ops::create_round(conn, channel, &pool, settings, notifier, now, rng).map(Some)
}

/// Creates a round for every channel that is due one.
pub fn sweep_rounds<R: Rng + ?Sized>(
    conn: &Connection,
    provider: &dyn CandidateProvider,
    notifier: &dyn Notifier,
    settings: &SolverSettings,
    now: DateTime<Utc>,
    rng: &mut R,
) -> SupResult<SweepReport> {
    let channels = channel_repo::find_all(conn)?;
    let mut report = SweepReport {
        channels: channels.len(),
        ..SweepReport::default()
    };

    for channel in &channels {
        match create_if_due(conn, channel, provider, notifier, settings, now, rng) {
            Ok(Some(created)) => {
                report.rounds_created += 1;
                info!(channel = %channel.name, summary = ?created.summary, "Created round");
            }
            Ok(None) => {}
            Err(e) => {
                report.failures += 1;
                warn!(channel = %channel.name, error = %e, "Round sweep failed");
            }
        }
    }

    Ok(report)
}

type Step = fn(&Connection, &Channel, &dyn Notifier, DateTime<Utc>) -> SupResult<Option<Round>>;

/// Runs one follow-up step, returning 1 when it fired.
fn run_step(
    conn: &Connection,
    channel: &Channel,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
    (name, step): (&str, Step),
    failures: &mut usize,
) -> usize {
    match step(conn, channel, notifier, now) {
        Ok(Some(_)) => 1,
        Ok(None) => 0,
        Err(e) => {
            *failures += 1;
            warn!(channel = %channel.name, step = name, error = %e, "Follow-up sweep failed");
            0
        }
    }
}

/// Runs remind, ask and ask-again, in that order, against each
/// channel's latest round. Each step is isolated from the others.
pub fn sweep_follow_ups(conn: &Connection, notifier: &dyn Notifier, now: DateTime<Utc>) -> SupResult<SweepReport> {
    let channels = channel_repo::find_all(conn)?;
    let mut report = SweepReport {
        channels: channels.len(),
        ..SweepReport::default()
    };

    for channel in &channels {
        let failures = &mut report.failures;
        report.reminded += run_step(conn, channel, notifier, now, ("remind", followup_ops::remind), failures);
        report.asked += run_step(conn, channel, notifier, now, ("ask", followup_ops::ask), failures);
        report.asked_again += run_step(conn, channel, notifier, now, ("ask_again", followup_ops::ask_again), failures);
    }

    Ok(report)
}
