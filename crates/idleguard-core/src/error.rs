//! Error types for policy construction, collaborators and class schedules.

use thiserror::Error;

/// Rejected session configuration. Never clamped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("warning lead time ({warning_lead_ms}ms) must be shorter than the timeout ({timeout_ms}ms)")]
    WarningNotBeforeTimeout { warning_lead_ms: u64, timeout_ms: u64 },

    #[error("session check interval must be greater than zero")]
    ZeroSessionCheckInterval,

    #[error("excluded path prefixes must not be empty strings")]
    EmptyExcludedPath,

    #[error("at least one activity signal kind is required")]
    NoActivitySignals,

    #[error("logout redirect path must be absolute: {0:?}")]
    RelativeRedirectPath(String),
}

/// Failure reported by the auth collaborator.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth backend unavailable: {0}")]
    Unavailable(String),

    #[error("auth request timed out")]
    Timeout,

    #[error("auth backend rejected request: {0}")]
    Rejected(String),

    #[error("auth io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid live-class schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("class {id:?} ends at or before it starts")]
    EndsBeforeStart { id: String },
}
