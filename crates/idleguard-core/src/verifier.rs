//! Session verifier: periodic session-existence poll.
//!
//! A failed poll is not evidence of logout. Only an explicit "no session"
//! answer is; errors keep the last known state and the next poll retries.

use crate::auth::AuthCollaborator;
use crate::error::AuthError;
use crate::host::HostEnvironment;
use crate::timer::{TimerHandle, TimerKind, TimerToken};

/// Result of one liveness poll.
#[derive(Debug)]
pub enum SessionCheckOutcome {
    Present,
    Missing,
    Failed(AuthError),
}

#[derive(Debug, Default)]
pub struct SessionVerifier {
    pending: Option<(u64, TimerHandle)>,
    last_known: Option<bool>,
    checks: u64,
    failures: u64,
}

impl SessionVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next poll, replacing any pending one.
    pub fn schedule<H>(&mut self, host: &mut H, interval_ms: u64, generation: u64)
    where
        H: HostEnvironment + ?Sized,
    {
        self.stop(host);
        let handle = host.schedule(
            interval_ms,
            TimerToken::new(TimerKind::SessionCheck, generation),
        );
        self.pending = Some((generation, handle));
    }

    /// Cancel the pending poll, if any.
    pub fn stop<H>(&mut self, host: &mut H)
    where
        H: HostEnvironment + ?Sized,
    {
        if let Some((_, handle)) = self.pending.take() {
            host.cancel(handle);
        }
    }

    /// Whether `token` is the pending poll.
    pub fn is_current(&self, token: TimerToken) -> bool {
        token.kind == TimerKind::SessionCheck
            && self
                .pending
                .is_some_and(|(generation, _)| generation == token.generation)
    }

    /// Consume the pending poll and query the collaborator.
    pub fn check<A>(&mut self, auth: &mut A) -> SessionCheckOutcome
    where
        A: AuthCollaborator + ?Sized,
    {
        self.pending = None;
        self.checks = self.checks.saturating_add(1);
        match auth.session_exists() {
            Ok(true) => {
                self.last_known = Some(true);
                SessionCheckOutcome::Present
            }
            Ok(false) => {
                self.last_known = Some(false);
                SessionCheckOutcome::Missing
            }
            Err(e) => {
                self.failures = self.failures.saturating_add(1);
                SessionCheckOutcome::Failed(e)
            }
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Last definitive answer; `None` before the first successful poll.
    pub fn last_known(&self) -> Option<bool> {
        self.last_known
    }

    pub fn checks(&self) -> u64 {
        self.checks
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}
