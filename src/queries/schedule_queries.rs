use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::model::ChannelConfig;

/// Days searched past the first day the cadence allows.
const HORIZON_DAYS: u32 = 14;

/// A local wall-clock time in the channel's zone, as UTC. Falls forward an
/// hour when the time does not exist (DST gap).
fn local_at(config: &ChannelConfig, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    let naive = date.and_time(time);
    config
        .timezone
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            config
                .timezone
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// `weeks` before `at`, or `None` past the representable range.
pub(crate) fn weeks_before(at: DateTime<Utc>, weeks: u32) -> Option<DateTime<Utc>> {
    Duration::try_weeks(weeks as i64).and_then(|d| at.checked_sub_signed(d))
}

fn weeks_after(at: DateTime<Utc>, weeks: u32) -> Option<DateTime<Utc>> {
    Duration::try_weeks(weeks as i64).and_then(|d| at.checked_add_signed(d))
}

/// Latest previous-round time that still allows a round on `date`.
fn cadence_cutoff(config: &ChannelConfig, date: NaiveDate) -> Option<DateTime<Utc>> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
    local_at(config, date, end_of_day)
        .map(|eod| weeks_before(eod, config.every_n_weeks).unwrap_or(DateTime::<Utc>::MIN_UTC))
}

/// Whether a channel should start a new round now: the round weekday, at
/// or after the configured time, and at least the cadence since the last
/// round.
pub fn is_round_due(config: &ChannelConfig, last_round_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&config.timezone);
    if local.weekday() != config.round_weekday || local.time() < config.time_of_day {
        return false;
    }
    match cadence_cutoff(config, local.date_naive()) {
        Some(cutoff) => last_round_at.map_or(true, |last| last <= cutoff),
        None => false,
    }
}

/// When the next round is due. May be earlier than `now` if the round for
/// today is overdue.
pub fn next_round_at(
    config: &ChannelConfig,
    last_round_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let today = now.with_timezone(&config.timezone).date_naive();
    // No earlier local day can satisfy the cadence.
    let mut date = match last_round_at {
        Some(last) => weeks_after(last, config.every_n_weeks)?
            .with_timezone(&config.timezone)
            .date_naive()
            .pred_opt()?
            .max(today),
        None => today,
    };

    for _ in 0..=HORIZON_DAYS {
        if date.weekday() == config.round_weekday {
            let allowed = cadence_cutoff(config, date)
                .is_some_and(|cutoff| last_round_at.map_or(true, |last| last <= cutoff));
            if allowed {
                return local_at(config, date, config.time_of_day);
            }
        }
        date = date.succ_opt()?;
    }
    None
}
