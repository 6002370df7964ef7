use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use super::followup_ops::deliver;
use crate::db::{group_repo, round_repo};
use crate::error::SupResult;
use crate::model::{
    CandidatePool, CaptainHistory, Channel, Group, HistoryFact, Id, MeetingHistory, Member, Round,
    RoundCounts, SolverSettings,
};
use crate::notify::{Notifier, Signal};
use crate::queries::round_summary::{summarize, SummaryCategory};
use crate::queries::schedule_queries::weeks_before;
use crate::solver::{choose_captain, leftover, Deadline, GroupRules, Leftover, Partitioner};
use crate::validation;

/// A freshly run round and how it went.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: Round,
    pub summary: SummaryCategory,
    pub leftover: Leftover,
    /// The search ran out of time before it finished.
    pub timed_out: bool,
    /// Members placed by each partitioning attempt.
    pub coverage: Vec<usize>,
}

/// Runs the grouping for a new round of `channel` without touching the
/// store. `history` holds the channel's earlier groups.
pub fn run_round<R: Rng + ?Sized>(
    channel: &Channel,
    pool: &CandidatePool,
    history: &[HistoryFact],
    settings: &SolverSettings,
    now: DateTime<Utc>,
    rng: &mut R,
) -> SupResult<RoundReport> {
    let config = &channel.config;
    validation::validate_config(config)?;

    let deadline = Deadline::after(settings.timeout());
    let mut round = Round::create(channel.id, now);
    round.ran_at = Some(now);
    info!(
        channel = %channel.name,
        round = %round.id,
        candidates = pool.eligible.len(),
        group_size = config.group_size,
        "Generating groups"
    );

    // A window reaching past the earliest representable time covers all history.
    let since = weeks_before(now, config.recency_weeks).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let rules = GroupRules::new(MeetingHistory::from_facts(history, round.id, since));
    let partition = Partitioner::new(&rules, config.group_size)?
        .with_attempts(settings.attempts)?
        .partition(&pool.eligible, deadline, rng);

    let mut groups = partition.groups;
    let resolution = leftover::resolve(
        &mut groups,
        partition.remainder,
        config.group_size,
        config.allow_odd,
        &rules,
    );

    let captains = CaptainHistory::from_facts(history);
    let round_id = round.id;
    round.groups = groups
        .into_iter()
        .map(|members| {
            let member_ids: Vec<Id<Member>> = members.iter().map(|m| m.id).collect();
            let mut group = Group::create(round_id, member_ids, now);
            group.captain_id = choose_captain(&group.member_ids, &captains);
            debug!(
                group = %group.id,
                members = ?members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
                "Created group"
            );
            group
        })
        .collect();

    let paired: HashSet<Id<Member>> = round
        .groups
        .iter()
        .flat_map(|g| g.member_ids.iter().copied())
        .collect();
    round.counts = RoundCounts {
        total: pool.total,
        opted_in: pool.opted_in,
        opted_out: pool.opted_out,
        on_vacation: pool.on_vacation,
        paired: paired.len(),
        missed: pool.eligible.len().saturating_sub(paired.len()),
    };
    let summary = summarize(&round.counts, config.group_size);

    info!(
        channel = %channel.name,
        total = round.counts.total,
        opted_out = round.counts.opted_out,
        on_vacation = round.counts.on_vacation,
        paired = round.counts.paired,
        missed = round.counts.missed,
        ?summary,
        "Finished round"
    );

    Ok(RoundReport {
        round,
        summary,
        leftover: resolution.leftover,
        timed_out: partition.timed_out,
        coverage: partition.coverage,
    })
}

/// Runs and stores a new round, then introduces each group and sends the
/// channel its summary. Delivery failures are logged, not returned.
pub fn create_round<R: Rng + ?Sized>(
    conn: &Connection,
    channel: &Channel,
    pool: &CandidatePool,
    settings: &SolverSettings,
    notifier: &dyn Notifier,
    now: DateTime<Utc>,
    rng: &mut R,
) -> SupResult<RoundReport> {
    let history = group_repo::history_for_channel(conn, channel.id)?;
    let report = run_round(channel, pool, &history, settings, now, rng)?;
    round_repo::insert(conn, &report.round)?;

    deliver(notifier, Signal::Introduce, report.round.groups.iter());
    if let Err(e) = notifier.notify_round(&report.round, report.summary) {
        warn!(round = %report.round.id, error = %e, "Failed to send round summary");
    }

    Ok(report)
}
