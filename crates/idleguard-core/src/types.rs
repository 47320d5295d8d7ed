//! Shared vocabulary: signal kinds, session phases, and phase changes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Activity Signals ────────────────────────────────────────────

/// Interaction signal kinds that may count as user activity.
///
/// Browser event names (`mousedown`, `keypress`, ...) are accepted as
/// aliases when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySignalKind {
    #[serde(alias = "mousedown", alias = "pointerdown")]
    PointerDown,
    #[serde(alias = "mousemove", alias = "pointermove")]
    PointerMove,
    #[serde(alias = "keypress", alias = "keydown")]
    KeyPress,
    Scroll,
    #[serde(alias = "touchstart")]
    TouchStart,
    Click,
    Focus,
}

impl ActivitySignalKind {
    pub const ALL: [Self; 7] = [
        Self::PointerDown,
        Self::PointerMove,
        Self::KeyPress,
        Self::Scroll,
        Self::TouchStart,
        Self::Click,
        Self::Focus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointer_down",
            Self::PointerMove => "pointer_move",
            Self::KeyPress => "key_press",
            Self::Scroll => "scroll",
            Self::TouchStart => "touch_start",
            Self::Click => "click",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for ActivitySignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Phases ──────────────────────────────────────────────────────

/// Phase of a live attachment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Counting toward the warning.
    #[default]
    Idle,
    /// Warning raised; counting toward forced logout.
    WarningShown,
    /// Terminal for the attachment.
    LoggedOut,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        self == Self::LoggedOut
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::WarningShown => "warning_shown",
            Self::LoggedOut => "logged_out",
        })
    }
}

/// Why an attachment reached [`SessionPhase::LoggedOut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// The logout timer fired.
    IdleTimeout,
    /// "Log out now" from the warning, or an explicit host call.
    UserRequested,
    /// The session liveness poll found no backing session.
    SessionMissing,
}

/// What moved the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum ChangeCause {
    Activity(ActivitySignalKind),
    StayLoggedIn,
    WarningTimer,
    Logout(LogoutReason),
}

/// A single phase transition, as reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseChange {
    pub from: SessionPhase,
    pub to: SessionPhase,
    pub cause: ChangeCause,
    pub at: DateTime<Utc>,
}

// ─── Activity State ──────────────────────────────────────────────

/// Mutable per-attachment state. Only the controller writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityState {
    pub last_activity_at: DateTime<Utc>,
    pub phase: SessionPhase,
    /// Set on entering `WarningShown`, cleared on reset.
    pub warning_shown_at: Option<DateTime<Utc>>,
    pub logged_out: Option<LogoutReason>,
}

impl ActivityState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_activity_at: now,
            phase: SessionPhase::Idle,
            warning_shown_at: None,
            logged_out: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_kinds_accept_browser_event_names() {
        let kinds: Vec<ActivitySignalKind> = serde_json::from_str(
            r#"["mousedown","mousemove","keypress","scroll","touchstart","click","focus"]"#,
        )
        .expect("browser names parse");
        assert_eq!(kinds, ActivitySignalKind::ALL.to_vec());
    }

    #[test]
    fn signal_kind_display_matches_serde_name() {
        for kind in ActivitySignalKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn only_logged_out_is_terminal() {
        assert!(!SessionPhase::Idle.is_terminal());
        assert!(!SessionPhase::WarningShown.is_terminal());
        assert!(SessionPhase::LoggedOut.is_terminal());
    }
}
