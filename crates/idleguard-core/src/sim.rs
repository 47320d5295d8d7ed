//! Virtual-time host and in-memory collaborators.
//!
//! [`ManualHost`] keeps scheduled timers in a due-ordered queue and only
//! fires them when told to advance, so tests can step through hours of idle
//! time deterministically. [`Simulation`] bundles a controller with the
//! in-memory collaborators below.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeDelta, Utc};

use crate::auth::AuthCollaborator;
use crate::controller::{NavigationOutcome, SessionController};
use crate::error::AuthError;
use crate::host::HostEnvironment;
use crate::navigation::Navigator;
use crate::policy::SessionPolicy;
use crate::presenter::PresenterAction;
use crate::timer::{TimerHandle, TimerToken, deadline};
use crate::types::{ActivitySignalKind, PhaseChange, SessionPhase};

// ─── ManualHost ──────────────────────────────────────────────────

/// Host environment with a manually advanced clock.
///
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug)]
pub struct ManualHost {
    now: DateTime<Utc>,
    next_handle: u64,
    next_seq: u64,
    queue: BTreeMap<(DateTime<Utc>, u64), (TimerHandle, TimerToken)>,
    index: HashMap<TimerHandle, (DateTime<Utc>, u64)>,
    subscriptions: BTreeMap<ActivitySignalKind, u32>,
    subscribe_calls: u64,
    unsubscribe_calls: u64,
}

impl ManualHost {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            next_handle: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            index: HashMap::new(),
            subscriptions: BTreeMap::new(),
            subscribe_calls: 0,
            unsubscribe_calls: 0,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Move the clock forward. Moving backward is ignored.
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = self.now.max(now);
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = (DateTime<Utc>, TimerToken)> + '_ {
        self.queue.iter().map(|(&(due, _), &(_, token))| (due, token))
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until: DateTime<Utc>) -> Option<(DateTime<Utc>, TimerToken)> {
        let (&key, _) = self.queue.first_key_value()?;
        if key.0 > until {
            return None;
        }
        let (handle, token) = self.queue.remove(&key)?;
        self.index.remove(&handle);
        self.set_now(key.0);
        Some((key.0, token))
    }

    pub fn subscription_count(&self, kind: ActivitySignalKind) -> u32 {
        self.subscriptions.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_subscribed(&self, kind: ActivitySignalKind) -> bool {
        self.subscription_count(kind) > 0
    }

    /// Number of kinds with at least one live subscription.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn subscribe_calls(&self) -> u64 {
        self.subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> u64 {
        self.unsubscribe_calls
    }
}

impl HostEnvironment for ManualHost {
    fn schedule(&mut self, delay_ms: u64, token: TimerToken) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let key = (deadline(self.now, delay_ms), self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, (handle, token));
        self.index.insert(handle, key);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(key) = self.index.remove(&handle) {
            self.queue.remove(&key);
        }
    }

    fn subscribe(&mut self, kind: ActivitySignalKind) {
        self.subscribe_calls += 1;
        *self.subscriptions.entry(kind).or_insert(0) += 1;
    }

    fn unsubscribe(&mut self, kind: ActivitySignalKind) {
        self.unsubscribe_calls += 1;
        if let Entry::Occupied(mut entry) = self.subscriptions.entry(kind) {
            *entry.get_mut() -= 1;
            if *entry.get() == 0 {
                entry.remove();
            }
        }
    }
}

// ─── MemoryAuth ──────────────────────────────────────────────────

/// In-memory auth collaborator with scriptable failures.
#[derive(Debug, Default)]
pub struct MemoryAuth {
    session: bool,
    failing_checks: u32,
    fail_sign_out: bool,
    check_calls: u32,
    sign_out_calls: u32,
}

impl MemoryAuth {
    pub fn signed_in() -> Self {
        Self {
            session: true,
            ..Self::default()
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn set_session(&mut self, present: bool) {
        self.session = present;
    }

    pub fn has_session(&self) -> bool {
        self.session
    }

    /// Make the next `n` liveness polls fail with a network-style error.
    pub fn fail_next_checks(&mut self, n: u32) {
        self.failing_checks = n;
    }

    pub fn fail_sign_out(&mut self, fail: bool) {
        self.fail_sign_out = fail;
    }

    pub fn check_calls(&self) -> u32 {
        self.check_calls
    }

    pub fn sign_out_calls(&self) -> u32 {
        self.sign_out_calls
    }
}

impl AuthCollaborator for MemoryAuth {
    fn session_exists(&mut self) -> Result<bool, AuthError> {
        self.check_calls += 1;
        if self.failing_checks > 0 {
            self.failing_checks -= 1;
            return Err(AuthError::Unavailable("simulated network error".to_string()));
        }
        Ok(self.session)
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        self.sign_out_calls += 1;
        if self.fail_sign_out {
            return Err(AuthError::Timeout);
        }
        self.session = false;
        Ok(())
    }
}

// ─── MemoryNavigator ─────────────────────────────────────────────

/// Navigator that records redirects. A redirect changes the current path
/// but does not notify the controller.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    path: String,
    redirects: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirects: Vec::new(),
        }
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn redirects(&self) -> &[String] {
        &self.redirects
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn redirect(&mut self, path: &str) {
        self.redirects.push(path.to_string());
        self.path = path.to_string();
    }
}

// ─── Simulation ──────────────────────────────────────────────────

pub type SimController = SessionController<ManualHost, MemoryAuth, MemoryNavigator>;

/// A controller on virtual time, attached (if guarded) at `start`.
pub struct Simulation {
    controller: SimController,
    start: DateTime<Utc>,
}

impl Simulation {
    /// Signed-in session starting on `path`.
    pub fn new(policy: SessionPolicy, path: &str, start: DateTime<Utc>) -> Self {
        Self::with_auth(policy, path, MemoryAuth::signed_in(), start)
    }

    pub fn with_auth(
        policy: SessionPolicy,
        path: &str,
        auth: MemoryAuth,
        start: DateTime<Utc>,
    ) -> Self {
        let mut controller = SessionController::new(
            policy,
            ManualHost::new(start),
            auth,
            MemoryNavigator::new(path),
        );
        controller.sync_navigation(start);
        Self { controller, start }
    }

    pub fn controller(&self) -> &SimController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SimController {
        &mut self.controller
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.controller.env().now()
    }

    pub fn elapsed(&self) -> TimeDelta {
        self.now().signed_duration_since(self.start)
    }

    pub fn phase(&self) -> Option<SessionPhase> {
        self.controller.phase()
    }

    pub fn redirects(&self) -> &[String] {
        self.controller.navigator().redirects()
    }

    /// Fire every timer due up to and including `until`, in due order, then
    /// leave the clock at `until`.
    pub fn advance_to(&mut self, until: DateTime<Utc>) -> Vec<PhaseChange> {
        let mut changes = Vec::new();
        while let Some((at, token)) = self.controller.env_mut().pop_due(until) {
            if let Some(change) = self.controller.on_timer(token, at) {
                changes.push(change);
            }
        }
        self.controller.env_mut().set_now(until);
        changes
    }

    pub fn advance_by(&mut self, delta: TimeDelta) -> Vec<PhaseChange> {
        let until = self.now() + delta;
        self.advance_to(until)
    }

    /// Advance to `offset` after the simulation start.
    pub fn advance_to_offset(&mut self, offset: TimeDelta) -> Vec<PhaseChange> {
        self.advance_to(self.start + offset)
    }

    pub fn signal(&mut self, kind: ActivitySignalKind) -> Option<PhaseChange> {
        let now = self.now();
        self.controller.on_activity(kind, now)
    }

    pub fn act(&mut self, action: PresenterAction) -> Option<PhaseChange> {
        let now = self.now();
        self.controller.apply(action, now)
    }

    /// Change route and deliver the route change.
    pub fn navigate(&mut self, path: &str) -> NavigationOutcome {
        self.controller.navigator_mut().set_path(path);
        self.sync_navigation()
    }

    /// Deliver a pending route change (e.g. the one a redirect caused).
    pub fn sync_navigation(&mut self) -> NavigationOutcome {
        let now = self.now();
        self.controller.sync_navigation(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerKind;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T08:00:00Z")
            .expect("valid")
            .with_timezone(&Utc)
    }

    #[test]
    fn timers_fire_in_due_then_schedule_order() {
        let mut host = ManualHost::new(t0());
        host.schedule(2_000, TimerToken::new(TimerKind::Logout, 1));
        host.schedule(1_000, TimerToken::new(TimerKind::Warning, 1));
        host.schedule(1_000, TimerToken::new(TimerKind::SessionCheck, 2));

        let until = t0() + TimeDelta::seconds(5);
        let order: Vec<TimerKind> = std::iter::from_fn(|| host.pop_due(until))
            .map(|(_, token)| token.kind)
            .collect();

        assert_eq!(
            order,
            vec![TimerKind::Warning, TimerKind::SessionCheck, TimerKind::Logout]
        );
        assert_eq!(host.now(), t0() + TimeDelta::seconds(2));
    }

    #[test]
    fn pop_due_respects_until() {
        let mut host = ManualHost::new(t0());
        host.schedule(1_000, TimerToken::new(TimerKind::Warning, 1));
        assert!(host.pop_due(t0() + TimeDelta::milliseconds(999)).is_none());
        assert!(host.pop_due(t0() + TimeDelta::seconds(1)).is_some());
    }

    #[test]
    fn cancel_removes_timer() {
        let mut host = ManualHost::new(t0());
        let handle = host.schedule(1_000, TimerToken::new(TimerKind::Warning, 1));
        host.cancel(handle);
        host.cancel(handle);
        assert_eq!(host.pending_count(), 0);
        assert!(host.next_due().is_none());
    }

    #[test]
    fn clock_never_moves_backward() {
        let mut host = ManualHost::new(t0());
        host.set_now(t0() - TimeDelta::hours(1));
        assert_eq!(host.now(), t0());
    }

    #[test]
    fn navigator_redirect_updates_path() {
        let mut nav = MemoryNavigator::new("/dashboard");
        nav.redirect("/login");
        assert_eq!(nav.current_path(), "/login");
        assert_eq!(nav.redirects(), ["/login".to_string()]);
    }

    #[test]
    fn sign_out_clears_session_unless_failing() {
        let mut auth = MemoryAuth::signed_in();
        auth.sign_out().expect("sign out");
        assert!(!auth.has_session());

        let mut auth = MemoryAuth::signed_in();
        auth.fail_sign_out(true);
        assert!(auth.sign_out().is_err());
        assert!(auth.has_session());
        assert_eq!(auth.sign_out_calls(), 1);
    }
}
