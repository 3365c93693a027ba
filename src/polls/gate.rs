use chrono::{DateTime, Utc};

use crate::db::schema::Question;
use crate::polls::window::PollState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDecision {
    Allow,
    DenyNotYetPublished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDecision {
    Allow,
    DenyNotOpen,
}

/// Scheduled polls stay hidden; open and closed ones may be shown.
pub fn authorize_view(question: &Question, now: DateTime<Utc>) -> ViewDecision {
    match question.state(now) {
        PollState::Scheduled => ViewDecision::DenyNotYetPublished,
        PollState::Open | PollState::Closed => ViewDecision::Allow,
    }
}

pub fn authorize_vote(question: &Question, now: DateTime<Utc>) -> VoteDecision {
    match question.state(now) {
        PollState::Open => VoteDecision::Allow,
        PollState::Scheduled | PollState::Closed => VoteDecision::DenyNotOpen,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn question(start: Duration, end: Duration) -> (Question, DateTime<Utc>) {
        let now = Utc::now();
        let q = Question {
            id: 7,
            text: "Gate".to_string(),
            start_date: now + start,
            end_date: now + end,
        };

        (q, now)
    }

    #[test]
    fn test_scheduled_poll_denied() {
        let (q, now) = question(Duration::days(30), Duration::days(40));
        assert_eq!(authorize_view(&q, now), ViewDecision::DenyNotYetPublished);
        assert_eq!(authorize_vote(&q, now), VoteDecision::DenyNotOpen);
    }

    #[test]
    fn test_open_poll_allowed() {
        let (q, now) = question(-Duration::hours(1), Duration::hours(1));
        assert_eq!(authorize_view(&q, now), ViewDecision::Allow);
        assert_eq!(authorize_vote(&q, now), VoteDecision::Allow);
    }

    #[test]
    fn test_closed_poll_viewable_not_votable() {
        let (q, now) = question(-Duration::days(30), -Duration::days(10));
        assert_eq!(authorize_view(&q, now), ViewDecision::Allow);
        assert_eq!(authorize_vote(&q, now), VoteDecision::DenyNotOpen);
    }

    #[test]
    fn test_decision_recomputed_per_call() {
        let (q, now) = question(Duration::hours(1), Duration::hours(2));
        assert_eq!(authorize_vote(&q, now), VoteDecision::DenyNotOpen);
        assert_eq!(authorize_vote(&q, now + Duration::minutes(90)), VoteDecision::Allow);
        assert_eq!(authorize_vote(&q, now + Duration::hours(3)), VoteDecision::DenyNotOpen);
    }
}
