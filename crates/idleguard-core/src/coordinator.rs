//! Timer coordinator: the warning/logout timer pair.
//!
//! Both deadlines are computed from the same `now` baseline. Arming always
//! cancels the previous pair first, so at most one pair is live.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::host::HostEnvironment;
use crate::policy::SessionPolicy;
use crate::timer::{TimerHandle, TimerKind, TimerToken, deadline};

/// The currently armed warning/logout pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArmedPair {
    pub generation: u64,
    pub armed_at: DateTime<Utc>,
    pub warning_at: DateTime<Utc>,
    pub logout_at: DateTime<Utc>,
    #[serde(skip)]
    warning: TimerHandle,
    #[serde(skip)]
    logout: TimerHandle,
}

#[derive(Debug, Default)]
pub struct TimerCoordinator {
    armed: Option<ArmedPair>,
}

impl TimerCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any live pair, then arm a fresh one tagged with `generation`.
    pub fn arm<H>(
        &mut self,
        host: &mut H,
        policy: &SessionPolicy,
        generation: u64,
        now: DateTime<Utc>,
    ) -> &ArmedPair
    where
        H: HostEnvironment + ?Sized,
    {
        self.cancel(host);

        let warning_after = policy.warning_after_ms();
        let timeout = policy.timeout_ms();
        let warning = host.schedule(warning_after, TimerToken::new(TimerKind::Warning, generation));
        let logout = host.schedule(timeout, TimerToken::new(TimerKind::Logout, generation));

        self.armed.insert(ArmedPair {
            generation,
            armed_at: now,
            warning_at: deadline(now, warning_after),
            logout_at: deadline(now, timeout),
            warning,
            logout,
        })
    }

    /// Cancel both timers of the live pair, if any.
    pub fn cancel<H>(&mut self, host: &mut H)
    where
        H: HostEnvironment + ?Sized,
    {
        if let Some(pair) = self.armed.take() {
            host.cancel(pair.warning);
            host.cancel(pair.logout);
        }
    }

    /// Whether `token` belongs to the live pair.
    pub fn is_current(&self, token: TimerToken) -> bool {
        matches!(token.kind, TimerKind::Warning | TimerKind::Logout)
            && self
                .armed
                .as_ref()
                .is_some_and(|pair| pair.generation == token.generation)
    }

    pub fn armed(&self) -> Option<&ArmedPair> {
        self.armed.as_ref()
    }
}
