use crate::model::{CaptainHistory, Id, Member};

/// Picks a member who has never captained, otherwise the one whose last
/// turn is the oldest. Ties go to the earlier member in the group.
pub fn choose_captain(member_ids: &[Id<Member>], history: &CaptainHistory) -> Option<Id<Member>> {
    member_ids
        .iter()
        .copied()
        .min_by_key(|id| history.last_captained(*id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HistoryFact;
    use chrono::{Duration, TimeZone, Utc};

    fn captained(member: Id<Member>, weeks_ago: i64) -> HistoryFact {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap();
        HistoryFact {
            round_id: Id::generate(),
            created_at: now - Duration::weeks(weeks_ago),
            member_ids: vec![member],
            captain_id: Some(member),
        }
    }

    #[test]
    fn prefers_member_never_captain() {
        let (a, b, c) = (Id::generate(), Id::generate(), Id::generate());
        let history = CaptainHistory::from_facts(&[captained(a, 4), captained(a, 5), captained(b, 6)]);
        assert_eq!(choose_captain(&[a, b, c], &history), Some(c));
    }

    #[test]
    fn prefers_oldest_captaincy() {
        let (a, b, c) = (Id::generate(), Id::generate(), Id::generate());
        let history = CaptainHistory::from_facts(&[
            captained(a, 4),
            captained(a, 5),
            captained(b, 6),
            captained(c, 3),
        ]);
        assert_eq!(choose_captain(&[a, b, c], &history), Some(b));
    }

    #[test]
    fn ties_keep_group_order() {
        let (a, b) = (Id::generate(), Id::generate());
        assert_eq!(choose_captain(&[a, b], &CaptainHistory::default()), Some(a));
    }

    #[test]
    fn empty_group_has_no_captain() {
        assert_eq!(choose_captain(&[], &CaptainHistory::default()), None);
    }
}
