//! Timer tokens, host handles and generation tagging.
//!
//! Every armed timer carries a [`TimerToken`]. The controller remembers the
//! generation it armed last; a callback carrying any other generation was
//! superseded by a reset or detach and is ignored.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Which deadline a timer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Warning,
    Logout,
    SessionCheck,
}

/// Passed to the host at schedule time and handed back when the timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

impl TimerToken {
    pub fn new(kind: TimerKind, generation: u64) -> Self {
        Self { kind, generation }
    }
}

/// Opaque host-assigned handle used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Monotonic generation source. Generation 0 is never issued.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    last: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next generation.
    pub fn bump(&mut self) -> u64 {
        self.last = self.last.wrapping_add(1).max(1);
        self.last
    }

    pub fn last(&self) -> u64 {
        self.last
    }
}

/// Milliseconds as a `TimeDelta`, saturating at `TimeDelta::MAX`.
pub fn delta_ms(ms: u64) -> TimeDelta {
    i64::try_from(ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .unwrap_or(TimeDelta::MAX)
}

/// `now + ms`, saturating at the end of representable time.
pub fn deadline(now: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    now.checked_add_signed(delta_ms(ms))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
