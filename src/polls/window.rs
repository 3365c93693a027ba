//! Publication and voting windows.
//!
//! Everything here is a pure function of the poll's timestamps and the
//! current instant. State is never stored; callers recompute it per access.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::db::schema::Question;
use crate::error::{PollError, PollResult};

pub fn is_published(start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= start
}

/// True when the poll opened at most one day ago, bounds included.
pub fn was_published_recently(start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - Duration::days(1) <= start && start <= now
}

pub fn can_vote(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    is_published(start, now) && now <= end
}

/// Rejects windows that close before they open. The evaluators above never
/// call this; a malformed window simply never accepts votes.
pub fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> PollResult<()> {
    if end < start {
        return Err(PollError::InvalidWindow);
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Scheduled,
    Open,
    Closed,
}

impl PollState {
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if !is_published(start, now) {
            PollState::Scheduled
        } else if now <= end {
            PollState::Open
        } else {
            PollState::Closed
        }
    }
}

impl Question {
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        is_published(self.start_date, now)
    }

    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        was_published_recently(self.start_date, now)
    }

    pub fn can_vote(&self, now: DateTime<Utc>) -> bool {
        can_vote(self.start_date, self.end_date, now)
    }

    pub fn state(&self, now: DateTime<Utc>) -> PollState {
        PollState::at(self.start_date, self.end_date, now)
    }
}
