//! Session policy and its user-facing configuration.
//!
//! [`SessionConfig`] is the serde-facing shape (minutes, lists) read from
//! TOML; [`SessionPolicy`] is the validated, immutable form the controller
//! runs with. Invalid configurations are rejected, never clamped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::path_policy::PathPolicy;
use crate::types::ActivitySignalKind;

// ─── Defaults ────────────────────────────────────────────────────

pub const DEFAULT_TIMEOUT_MINUTES: u64 = 150;
pub const DEFAULT_WARNING_MINUTES: u64 = 5;
pub const DEFAULT_SESSION_CHECK_INTERVAL_MINUTES: u64 = 1;
pub const DEFAULT_LOGOUT_REDIRECT_PATH: &str = "/login";
pub const DEFAULT_WARNING_MESSAGE: &str =
    "You have been inactive for a while. For your security you will be logged out soon.";
pub const DEFAULT_EXCLUDED_PATHS: &[&str] =
    &["/login", "/signup", "/forgot-password", "/reset-password"];

const MS_PER_MINUTE: u64 = 60_000;

// ─── Config ──────────────────────────────────────────────────────

/// Recognized configuration options. camelCase spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(alias = "timeoutMinutes")]
    pub timeout_minutes: u64,
    #[serde(alias = "warningMinutes")]
    pub warning_minutes: u64,
    #[serde(alias = "excludedPaths")]
    pub excluded_paths: Vec<String>,
    #[serde(alias = "activityEvents")]
    pub activity_events: Vec<ActivitySignalKind>,
    #[serde(alias = "sessionCheckIntervalMinutes")]
    pub session_check_interval_minutes: u64,
    #[serde(alias = "logoutRedirectPath")]
    pub logout_redirect_path: String,
    #[serde(alias = "warningMessage")]
    pub warning_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            warning_minutes: DEFAULT_WARNING_MINUTES,
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| (*p).to_string()).collect(),
            activity_events: ActivitySignalKind::ALL.to_vec(),
            session_check_interval_minutes: DEFAULT_SESSION_CHECK_INTERVAL_MINUTES,
            logout_redirect_path: DEFAULT_LOGOUT_REDIRECT_PATH.to_string(),
            warning_message: DEFAULT_WARNING_MESSAGE.to_string(),
        }
    }
}

impl SessionConfig {
    /// Validate and convert into a [`SessionPolicy`].
    pub fn into_policy(self) -> Result<SessionPolicy, PolicyError> {
        SessionPolicy::builder(
            self.timeout_minutes.saturating_mul(MS_PER_MINUTE),
            self.warning_minutes.saturating_mul(MS_PER_MINUTE),
        )
        .session_check_interval_ms(self.session_check_interval_minutes.saturating_mul(MS_PER_MINUTE))
        .excluded_paths(self.excluded_paths)
        .activity_signals(self.activity_events)
        .logout_redirect_path(self.logout_redirect_path)
        .warning_message(self.warning_message)
        .build()
    }
}

// ─── Policy ──────────────────────────────────────────────────────

/// Validated, immutable session policy.
///
/// Invariant: `warning_lead_ms < timeout_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPolicy {
    timeout_ms: u64,
    warning_lead_ms: u64,
    session_check_interval_ms: u64,
    paths: PathPolicy,
    activity_signals: BTreeSet<ActivitySignalKind>,
    logout_redirect_path: String,
    warning_message: String,
}

impl SessionPolicy {
    /// Start a builder with the two required durations; everything else
    /// takes the documented defaults.
    pub fn builder(timeout_ms: u64, warning_lead_ms: u64) -> SessionPolicyBuilder {
        SessionPolicyBuilder {
            timeout_ms,
            warning_lead_ms,
            session_check_interval_ms: DEFAULT_SESSION_CHECK_INTERVAL_MINUTES * MS_PER_MINUTE,
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| (*p).to_string()).collect(),
            activity_signals: ActivitySignalKind::ALL.to_vec(),
            logout_redirect_path: DEFAULT_LOGOUT_REDIRECT_PATH.to_string(),
            warning_message: DEFAULT_WARNING_MESSAGE.to_string(),
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn warning_lead_ms(&self) -> u64 {
        self.warning_lead_ms
    }

    /// Idle time after which the warning is raised: `timeout - lead`.
    pub fn warning_after_ms(&self) -> u64 {
        self.timeout_ms - self.warning_lead_ms
    }

    pub fn session_check_interval_ms(&self) -> u64 {
        self.session_check_interval_ms
    }

    pub fn path_policy(&self) -> &PathPolicy {
        &self.paths
    }

    pub fn activity_signals(&self) -> &BTreeSet<ActivitySignalKind> {
        &self.activity_signals
    }

    pub fn tracks(&self, kind: ActivitySignalKind) -> bool {
        self.activity_signals.contains(&kind)
    }

    pub fn logout_redirect_path(&self) -> &str {
        &self.logout_redirect_path
    }

    pub fn warning_message(&self) -> &str {
        &self.warning_message
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::builder(
            DEFAULT_TIMEOUT_MINUTES * MS_PER_MINUTE,
            DEFAULT_WARNING_MINUTES * MS_PER_MINUTE,
        )
        .assemble()
    }
}

/// Builder for [`SessionPolicy`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SessionPolicyBuilder {
    timeout_ms: u64,
    warning_lead_ms: u64,
    session_check_interval_ms: u64,
    excluded_paths: Vec<String>,
    activity_signals: Vec<ActivitySignalKind>,
    logout_redirect_path: String,
    warning_message: String,
}

impl SessionPolicyBuilder {
    #[must_use]
    pub fn session_check_interval_ms(mut self, ms: u64) -> Self {
        self.session_check_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn excluded_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn activity_signals(mut self, kinds: impl IntoIterator<Item = ActivitySignalKind>) -> Self {
        self.activity_signals = kinds.into_iter().collect();
        self
    }

    #[must_use]
    pub fn logout_redirect_path(mut self, path: impl Into<String>) -> Self {
        self.logout_redirect_path = path.into();
        self
    }

    #[must_use]
    pub fn warning_message(mut self, message: impl Into<String>) -> Self {
        self.warning_message = message.into();
        self
    }

    pub fn build(self) -> Result<SessionPolicy, PolicyError> {
        if self.timeout_ms == 0 {
            return Err(PolicyError::ZeroTimeout);
        }
        if self.warning_lead_ms >= self.timeout_ms {
            return Err(PolicyError::WarningNotBeforeTimeout {
                warning_lead_ms: self.warning_lead_ms,
                timeout_ms: self.timeout_ms,
            });
        }
        if self.session_check_interval_ms == 0 {
            return Err(PolicyError::ZeroSessionCheckInterval);
        }
        if self.excluded_paths.iter().any(String::is_empty) {
            return Err(PolicyError::EmptyExcludedPath);
        }
        if self.activity_signals.is_empty() {
            return Err(PolicyError::NoActivitySignals);
        }
        if !self.logout_redirect_path.starts_with('/') {
            return Err(PolicyError::RelativeRedirectPath(self.logout_redirect_path));
        }

        Ok(self.assemble())
    }

    /// Unvalidated conversion. Callers check the invariants first.
    fn assemble(self) -> SessionPolicy {
        SessionPolicy {
            timeout_ms: self.timeout_ms,
            warning_lead_ms: self.warning_lead_ms,
            session_check_interval_ms: self.session_check_interval_ms,
            paths: PathPolicy::new(self.excluded_paths),
            activity_signals: self.activity_signals.into_iter().collect(),
            logout_redirect_path: self.logout_redirect_path,
            warning_message: self.warning_message,
        }
    }
}
