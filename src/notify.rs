//! Outbound signals. The crate decides when a group or channel hears
//! something; a `Notifier` decides how.

use tracing::info;

use crate::error::SupResult;
use crate::model::{Group, Round};
use crate::queries::round_summary::SummaryCategory;

/// A message owed to the members of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The group was just formed; introduce members and captain.
    Introduce,
    Remind,
    Ask,
    AskAgain,
}

pub trait Notifier {
    fn notify_group(&self, signal: Signal, group: &Group) -> SupResult<()>;

    fn notify_round(&self, round: &Round, summary: SummaryCategory) -> SupResult<()>;
}

/// Logs every signal and delivers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_group(&self, signal: Signal, group: &Group) -> SupResult<()> {
        info!(?signal, group = %group.id, members = group.member_ids.len(), "Group signal");
        Ok(())
    }

    fn notify_round(&self, round: &Round, summary: SummaryCategory) -> SupResult<()> {
        info!(round = %round.id, ?summary, "Round summary");
        Ok(())
    }
}
