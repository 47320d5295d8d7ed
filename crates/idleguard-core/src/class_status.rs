//! Live-class status by wall-clock comparison.
//!
//! `Scheduled → Ongoing → Completed`, forward only. The meeting link is
//! handed out only while the class is ongoing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveClassStatus {
    Scheduled,
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveClass {
    pub id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub meeting_link: Option<String>,
}

impl LiveClass {
    /// Rejects a class whose end is not after its start.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, ScheduleError> {
        let id = id.into();
        if ends_at <= starts_at {
            return Err(ScheduleError::EndsBeforeStart { id });
        }
        Ok(Self {
            id,
            title: title.into(),
            starts_at,
            ends_at,
            meeting_link: None,
        })
    }

    #[must_use]
    pub fn with_meeting_link(mut self, link: impl Into<String>) -> Self {
        self.meeting_link = Some(link.into());
        self
    }

    /// Start inclusive, end exclusive.
    pub fn status_at(&self, now: DateTime<Utc>) -> LiveClassStatus {
        if now < self.starts_at {
            LiveClassStatus::Scheduled
        } else if now < self.ends_at {
            LiveClassStatus::Ongoing
        } else {
            LiveClassStatus::Completed
        }
    }

    /// The status to move to from `current`, if it moves forward at `now`.
    /// A stored status is never moved backward (e.g. after a clock skew or a
    /// manual "completed" mark).
    pub fn advance(&self, current: LiveClassStatus, now: DateTime<Utc>) -> Option<LiveClassStatus> {
        let observed = self.status_at(now);
        (observed > current).then_some(observed)
    }

    pub fn join_link(&self, now: DateTime<Utc>) -> Option<&str> {
        match self.status_at(now) {
            LiveClassStatus::Ongoing => self.meeting_link.as_deref(),
            LiveClassStatus::Scheduled | LiveClassStatus::Completed => None,
        }
    }
}
