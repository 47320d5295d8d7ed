//! Warning presenter: countdown view and the two user actions.
//!
//! The presenter only renders. A countdown reaching zero does nothing by
//! itself; the logout timer owns that deadline.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::types::SessionPhase;

/// User actions offered by the warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenterAction {
    StayLoggedIn,
    LogoutNow,
}

/// What to show while the warning is up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningView {
    pub message: String,
    pub remaining_ms: u64,
    /// `MM:SS`, rounded up to the next whole second.
    pub countdown: String,
}

#[derive(Debug, Clone)]
pub struct WarningPresenter {
    message: String,
}

impl WarningPresenter {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A view only while `phase` is `WarningShown` and a remaining time is known.
    pub fn render(&self, phase: SessionPhase, remaining: Option<TimeDelta>) -> Option<WarningView> {
        if phase != SessionPhase::WarningShown {
            return None;
        }
        let remaining = remaining?;
        let remaining_ms = u64::try_from(remaining.num_milliseconds()).unwrap_or(0);
        Some(WarningView {
            message: self.message.clone(),
            remaining_ms,
            countdown: format_countdown(remaining),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Format a remaining duration as `MM:SS`. Negative values show `00:00`;
/// minutes are not wrapped into hours.
pub fn format_countdown(remaining: TimeDelta) -> String {
    let ms = remaining.num_milliseconds().max(0);
    let secs = (ms + 999) / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
