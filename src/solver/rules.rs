use crate::model::{Member, MeetingHistory};

/// Pairwise admission rules for placing members together.
#[derive(Debug, Clone, Default)]
pub struct GroupRules {
    history: MeetingHistory,
}

impl GroupRules {
    pub fn new(history: MeetingHistory) -> Self {
        Self { history }
    }

    /// Two members may share a full group: different teams and no
    /// recent meeting.
    pub fn compatible(&self, a: &Member, b: &Member) -> bool {
        !a.shares_team_with(b) && !self.history.met_recently(a.id, b.id)
    }

    /// Recency only. Leftover placement does not look at teams.
    pub fn met_recently(&self, members: &[&Member]) -> bool {
        let ids: Vec<_> = members.iter().map(|m| m.id).collect();
        self.history.any_met_recently(&ids)
    }

    pub fn is_valid_group(&self, members: &[&Member]) -> bool {
        members
            .iter()
            .enumerate()
            .all(|(i, a)| members[i + 1..].iter().all(|b| self.compatible(a, b)))
    }
}
