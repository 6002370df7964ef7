use serde::{Deserialize, Serialize};

use crate::model::RoundCounts;

/// Which summary a channel should receive after a round runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryCategory {
    /// Nobody enabled in the channel.
    NoMembers,
    /// Members exist but none opted in.
    NoOptedIn,
    /// Nobody paired; fewer opted in than one group needs.
    TooFewOptedIn,
    /// Nobody paired although enough opted in.
    NonePaired,
    /// Groups formed but some eligible members were left out.
    SomeMissed,
    /// Everyone eligible was placed; some were away.
    SomeOnVacation,
    AllPaired,
}

impl SummaryCategory {
    pub const ALL: &'static [SummaryCategory] = &[
        SummaryCategory::NoMembers,
        SummaryCategory::NoOptedIn,
        SummaryCategory::TooFewOptedIn,
        SummaryCategory::NonePaired,
        SummaryCategory::SomeMissed,
        SummaryCategory::SomeOnVacation,
        SummaryCategory::AllPaired,
    ];

    pub fn is_success(&self) -> bool {
        matches!(self, SummaryCategory::SomeOnVacation | SummaryCategory::AllPaired)
    }
}

/// Selects the summary category; the first matching rule wins.
pub fn summarize(counts: &RoundCounts, group_size: usize) -> SummaryCategory {
    if counts.total == 0 {
        SummaryCategory::NoMembers
    } else if counts.opted_in == 0 {
        SummaryCategory::NoOptedIn
    } else if counts.paired == 0 && counts.opted_in < group_size {
        SummaryCategory::TooFewOptedIn
    } else if counts.paired == 0 {
        SummaryCategory::NonePaired
    } else if counts.missed > 0 {
        SummaryCategory::SomeMissed
    } else if counts.on_vacation > 0 {
        SummaryCategory::SomeOnVacation
    } else {
        SummaryCategory::AllPaired
    }
}
