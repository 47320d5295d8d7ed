//! Session activity & auto-logout controller.
//!
//! One controller per guarded navigation context. The host drives it with
//! four kinds of input, all on a single logical thread:
//!
//! - **route changes** via [`SessionController::sync_navigation`]
//! - **activity signals** via [`SessionController::on_activity`]
//! - **timer callbacks** via [`SessionController::on_timer`]
//! - **warning actions** via [`SessionController::apply`]
//!
//! Phase machine per attachment:
//!
//! ```text
//! Idle ──(timeout - lead)──▶ WarningShown ──(lead)──▶ LoggedOut
//!  ▲                              │
//!  └──── activity / stay ─────────┘
//! ```
//!
//! `LoggedOut` is terminal until the attachment is dropped (navigation to an
//! excluded path, or [`SessionController::detach`]) and a new one is made.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::activity::ActivityMonitor;
use crate::auth::AuthCollaborator;
use crate::coordinator::{ArmedPair, TimerCoordinator};
use crate::host::HostEnvironment;
use crate::incident::{Incident, IncidentKind, IncidentLog};
use crate::navigation::Navigator;
use crate::policy::SessionPolicy;
use crate::presenter::{PresenterAction, WarningPresenter, WarningView};
use crate::timer::{GenerationCounter, TimerKind, TimerToken};
use crate::types::{
    ActivitySignalKind, ActivityState, ChangeCause, LogoutReason, PhaseChange, SessionPhase,
};
use crate::verifier::{SessionCheckOutcome, SessionVerifier};

/// Result of re-evaluating the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOutcome {
    Attached,
    Detached,
    Unchanged,
}

/// Live attachment to a guarded context.
#[derive(Debug)]
struct Attachment {
    path: String,
    state: ActivityState,
    attached_at: DateTime<Utc>,
}

/// Serializable view of the controller for status output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub attached: bool,
    pub path: Option<String>,
    pub phase: Option<SessionPhase>,
    pub attached_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub timers: Option<ArmedPair>,
    pub warning: Option<WarningView>,
    pub session_last_known: Option<bool>,
    pub session_checks: u64,
    pub redirects: u64,
    pub incidents: Vec<Incident>,
}

pub struct SessionController<E, A, N> {
    policy: SessionPolicy,
    env: E,
    auth: A,
    nav: N,
    presenter: WarningPresenter,
    monitor: ActivityMonitor,
    timers: TimerCoordinator,
    verifier: SessionVerifier,
    generations: GenerationCounter,
    attachment: Option<Attachment>,
    incidents: IncidentLog,
    redirects: u64,
}

impl<E, A, N> SessionController<E, A, N>
where
    E: HostEnvironment,
    A: AuthCollaborator,
    N: Navigator,
{
    /// Create a detached controller. Call [`sync_navigation`](Self::sync_navigation)
    /// once the host is ready to attach to the current path.
    pub fn new(policy: SessionPolicy, env: E, auth: A, nav: N) -> Self {
        let presenter = WarningPresenter::new(policy.warning_message());
        Self {
            policy,
            env,
            auth,
            nav,
            presenter,
            monitor: ActivityMonitor::new(),
            timers: TimerCoordinator::new(),
            verifier: SessionVerifier::new(),
            generations: GenerationCounter::new(),
            attachment: None,
            incidents: IncidentLog::new(),
            redirects: 0,
        }
    }

    /// Record collaborator failures into `incidents` instead of a fresh log.
    #[must_use]
    pub fn with_incident_log(mut self, incidents: IncidentLog) -> Self {
        self.incidents = incidents;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// `None` while detached.
    pub fn phase(&self) -> Option<SessionPhase> {
        self.attachment.as_ref().map(|a| a.state.phase)
    }

    pub fn activity_state(&self) -> Option<&ActivityState> {
        self.attachment.as_ref().map(|a| &a.state)
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    pub fn attached_path(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.path.as_str())
    }

    pub fn armed(&self) -> Option<&ArmedPair> {
        self.timers.armed()
    }

    pub fn incidents(&self) -> &IncidentLog {
        &self.incidents
    }

    /// Redirects issued over the controller's lifetime.
    pub fn redirects(&self) -> u64 {
        self.redirects
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut A {
        &mut self.auth
    }

    pub fn navigator(&self) -> &N {
        &self.nav
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.nav
    }

    // ─── Navigation ──────────────────────────────────────────────

    /// Re-evaluate the current path against the path policy.
    ///
    /// Guarded and detached attaches; excluded and attached detaches.
    /// Moving between guarded paths keeps the attachment (and its timers).
    pub fn sync_navigation(&mut self, now: DateTime<Utc>) -> NavigationOutcome {
        let path = self.nav.current_path();
        let guarded = self.policy.path_policy().is_guarded(&path);

        match (self.attachment.is_some(), guarded) {
            (false, true) => {
                self.attach(path, now);
                NavigationOutcome::Attached
            }
            (true, false) => {
                debug!(path = %path, "navigated to excluded path");
                self.detach();
                NavigationOutcome::Detached
            }
            (true, true) => {
                if let Some(attachment) = self.attachment.as_mut()
                    && attachment.path != path
                {
                    attachment.path = path;
                }
                NavigationOutcome::Unchanged
            }
            (false, false) => NavigationOutcome::Unchanged,
        }
    }

    fn attach(&mut self, path: String, now: DateTime<Utc>) {
        self.monitor.attach(&mut self.env, self.policy.activity_signals());
        self.attachment = Some(Attachment {
            path,
            state: ActivityState::new(now),
            attached_at: now,
        });

        let generation = self.generations.bump();
        self.timers.arm(&mut self.env, &self.policy, generation, now);
        self.schedule_session_check();

        info!(
            path = self.attached_path().unwrap_or_default(),
            timeout_ms = self.policy.timeout_ms(),
            warning_lead_ms = self.policy.warning_lead_ms(),
            "session guard attached"
        );
    }

    /// Drop the attachment: cancel every timer and unsubscribe every signal.
    /// Safe to call while detached.
    pub fn detach(&mut self) {
        self.timers.cancel(&mut self.env);
        self.verifier.stop(&mut self.env);
        self.monitor.detach(&mut self.env);
        if let Some(attachment) = self.attachment.take() {
            info!(
                path = %attachment.path,
                phase = %attachment.state.phase,
                "session guard detached"
            );
        }
    }

    /// Swap in a new policy. A live attachment is re-subscribed and rearmed
    /// from `now`; the current path is re-evaluated under the new policy.
    pub fn reconfigure(&mut self, policy: SessionPolicy, now: DateTime<Utc>) -> NavigationOutcome {
        self.presenter = WarningPresenter::new(policy.warning_message());
        self.policy = policy;

        let outcome = self.sync_navigation(now);
        let live = self
            .attachment
            .as_ref()
            .is_some_and(|a| !a.state.phase.is_terminal());
        if outcome == NavigationOutcome::Unchanged && live {
            self.monitor.detach(&mut self.env);
            self.monitor.attach(&mut self.env, self.policy.activity_signals());
            self.reset_timers(now);
            self.schedule_session_check();
            info!("session guard reconfigured");
        }
        outcome
    }

    // ─── Activity & Reset ────────────────────────────────────────

    /// Cancel both timers, mark activity at `now`, return to `Idle`, and arm a
    /// fresh pair from `now`.
    ///
    /// Returns `false` (and does nothing) while detached or after logout: a
    /// signed-out attachment is never revived.
    pub fn reset_timers(&mut self, now: DateTime<Utc>) -> bool {
        let Some(attachment) = self.attachment.as_mut() else {
            return false;
        };
        if attachment.state.phase.is_terminal() {
            debug!("reset ignored after logout");
            return false;
        }

        attachment.state.last_activity_at = now;
        attachment.state.phase = SessionPhase::Idle;
        attachment.state.warning_shown_at = None;

        let generation = self.generations.bump();
        self.timers.arm(&mut self.env, &self.policy, generation, now);
        true
    }

    /// Deliver an interaction signal. Every accepted signal resets the timers;
    /// bursts are not coalesced.
    pub fn on_activity(&mut self, kind: ActivitySignalKind, now: DateTime<Utc>) -> Option<PhaseChange> {
        if !self.monitor.accepts(kind) {
            debug!(%kind, "signal not subscribed, ignored");
            return None;
        }
        self.reset_with_cause(ChangeCause::Activity(kind), now)
    }

    /// "Stay logged in": same effect as an activity signal.
    pub fn stay_logged_in(&mut self, now: DateTime<Utc>) -> Option<PhaseChange> {
        self.reset_with_cause(ChangeCause::StayLoggedIn, now)
    }

    /// "Log out now": immediate logout from any non-terminal phase.
    pub fn logout_now(&mut self, now: DateTime<Utc>) -> Option<PhaseChange> {
        self.force_logout(LogoutReason::UserRequested, now)
    }

    /// Dispatch a warning presenter action.
    pub fn apply(&mut self, action: PresenterAction, now: DateTime<Utc>) -> Option<PhaseChange> {
        match action {
            PresenterAction::StayLoggedIn => self.stay_logged_in(now),
            PresenterAction::LogoutNow => self.logout_now(now),
        }
    }

    fn reset_with_cause(&mut self, cause: ChangeCause, now: DateTime<Utc>) -> Option<PhaseChange> {
        let from = self.phase()?;
        if !self.reset_timers(now) {
            return None;
        }
        if from == SessionPhase::Idle {
            return None;
        }
        info!(from = %from, ?cause, "warning dismissed");
        Some(PhaseChange {
            from,
            to: SessionPhase::Idle,
            cause,
            at: now,
        })
    }

    // ─── Timers ──────────────────────────────────────────────────

    /// Deliver a timer callback. Callbacks from a superseded generation are
    /// no-ops.
    pub fn on_timer(&mut self, token: TimerToken, now: DateTime<Utc>) -> Option<PhaseChange> {
        match token.kind {
            TimerKind::Warning | TimerKind::Logout if !self.timers.is_current(token) => {
                debug!(?token, "stale timer callback ignored");
                None
            }
            TimerKind::SessionCheck if !self.verifier.is_current(token) => {
                debug!(?token, "stale session check ignored");
                None
            }
            TimerKind::Warning => self.raise_warning(now),
            TimerKind::Logout => self.force_logout(LogoutReason::IdleTimeout, now),
            TimerKind::SessionCheck => self.verify_session(now),
        }
    }

    fn raise_warning(&mut self, now: DateTime<Utc>) -> Option<PhaseChange> {
        let attachment = self.attachment.as_mut()?;
        if attachment.state.phase != SessionPhase::Idle {
            return None;
        }
        attachment.state.phase = SessionPhase::WarningShown;
        attachment.state.warning_shown_at = Some(now);

        info!(
            lead_ms = self.policy.warning_lead_ms(),
            "inactivity warning raised"
        );
        Some(PhaseChange {
            from: SessionPhase::Idle,
            to: SessionPhase::WarningShown,
            cause: ChangeCause::WarningTimer,
            at: now,
        })
    }

    fn verify_session(&mut self, now: DateTime<Utc>) -> Option<PhaseChange> {
        match self.verifier.check(&mut self.auth) {
            SessionCheckOutcome::Present => debug!("session present"),
            SessionCheckOutcome::Missing => {
                warn!("backing session missing, forcing logout");
                return self.force_logout(LogoutReason::SessionMissing, now);
            }
            SessionCheckOutcome::Failed(e) => {
                warn!(error = %e, "session check failed, keeping current state");
                self.incidents
                    .record(IncidentKind::SessionCheckFailure, e.to_string(), now);
            }
        }

        let live = self
            .attachment
            .as_ref()
            .is_some_and(|a| !a.state.phase.is_terminal());
        if live {
            self.schedule_session_check();
        }
        None
    }

    fn schedule_session_check(&mut self) {
        let generation = self.generations.bump();
        self.verifier.schedule(
            &mut self.env,
            self.policy.session_check_interval_ms(),
            generation,
        );
    }

    /// Enter `LoggedOut`: cancel everything, sign out, then redirect.
    /// The redirect does not depend on sign-out succeeding.
    fn force_logout(&mut self, reason: LogoutReason, now: DateTime<Utc>) -> Option<PhaseChange> {
        let attachment = self.attachment.as_mut()?;
        let from = attachment.state.phase;
        if from.is_terminal() {
            return None;
        }
        attachment.state.phase = SessionPhase::LoggedOut;
        attachment.state.logged_out = Some(reason);

        self.timers.cancel(&mut self.env);
        self.verifier.stop(&mut self.env);
        self.monitor.detach(&mut self.env);

        info!(from = %from, ?reason, "logging out");
        if let Err(e) = self.auth.sign_out() {
            warn!(error = %e, "sign-out failed, redirecting anyway");
            self.incidents
                .record(IncidentKind::SignOutFailure, e.to_string(), now);
        }

        let destination = self.policy.logout_redirect_path().to_string();
        self.nav.redirect(&destination);
        self.redirects = self.redirects.saturating_add(1);
        info!(destination = %destination, "redirected after logout");

        Some(PhaseChange {
            from,
            to: SessionPhase::LoggedOut,
            cause: ChangeCause::Logout(reason),
            at: now,
        })
    }

    // ─── Presentation ────────────────────────────────────────────

    /// Time left before the logout timer fires, while the warning is up.
    pub fn warning_remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        if self.phase()? != SessionPhase::WarningShown {
            return None;
        }
        self.timers
            .armed()
            .map(|pair| pair.logout_at.signed_duration_since(now))
    }

    pub fn warning_view(&self, now: DateTime<Utc>) -> Option<WarningView> {
        self.presenter
            .render(self.phase()?, self.warning_remaining(now))
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> ControllerSnapshot {
        let attachment = self.attachment.as_ref();
        ControllerSnapshot {
            attached: attachment.is_some(),
            path: attachment.map(|a| a.path.clone()),
            phase: attachment.map(|a| a.state.phase),
            attached_at: attachment.map(|a| a.attached_at),
            last_activity_at: attachment.map(|a| a.state.last_activity_at),
            timers: self.timers.armed().cloned(),
            warning: self.warning_view(now),
            session_last_known: self.verifier.last_known(),
            session_checks: self.verifier.checks(),
            redirects: self.redirects,
            incidents: self.incidents.entries().cloned().collect(),
        }
    }

    /// Detach and hand back the collaborators.
    pub fn dispose(mut self) -> (E, A, N) {
        self.detach();
        (self.env, self.auth, self.nav)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ManualHost, MemoryAuth, MemoryNavigator, Simulation};

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T08:00:00Z")
            .expect("valid RFC3339")
            .with_timezone(&Utc)
    }

    /// 10 minute timeout, 2 minute warning, check every minute.
    fn short_policy() -> SessionPolicy {
        SessionPolicy::builder(10 * 60_000, 2 * 60_000)
            .build()
            .expect("valid policy")
    }

    fn sim(path: &str) -> Simulation {
        Simulation::new(short_policy(), path, t0())
    }

    // ── Attachment ──────────────────────────────────────────────

    #[test]
    fn guarded_path_attaches_and_arms() {
        let s = sim("/dashboard");
        let c = s.controller();

        assert_eq!(c.phase(), Some(SessionPhase::Idle));
        assert_eq!(c.attached_path(), Some("/dashboard"));
        let pair = c.armed().expect("pair armed");
        assert_eq!(pair.warning_at, t0() + TimeDelta::minutes(8));
        assert_eq!(pair.logout_at, t0() + TimeDelta::minutes(10));
        // warning + logout + session check
        assert_eq!(c.env().pending_count(), 3);
        assert_eq!(c.env().active_subscriptions(), ActivitySignalKind::ALL.len());
    }

    #[test]
    fn excluded_path_stays_inert() {
        let mut s = sim("/login");
        assert!(!s.controller().is_attached());
        assert_eq!(s.controller().env().pending_count(), 0);
        assert_eq!(s.controller().env().active_subscriptions(), 0);

        let changes = s.advance_by(TimeDelta::hours(5));
        assert!(changes.is_empty());
        assert!(s.controller().phase().is_none());
    }

    #[test]
    fn navigating_between_guarded_paths_keeps_timers() {
        let mut s = sim("/dashboard");
        s.advance_by(TimeDelta::minutes(3));
        let before = s.controller().armed().cloned();

        assert_eq!(s.navigate("/classes/7"), NavigationOutcome::Unchanged);

        assert_eq!(s.controller().attached_path(), Some("/classes/7"));
        assert_eq!(s.controller().armed().cloned(), before);
    }

    #[test]
    fn excluded_then_guarded_reattaches_fresh() {
        let mut s = sim("/dashboard");
        assert_eq!(s.navigate("/login"), NavigationOutcome::Detached);
        s.advance_by(TimeDelta::minutes(30));
        assert_eq!(s.navigate("/dashboard"), NavigationOutcome::Attached);

        let pair = s.controller().armed().expect("armed");
        assert_eq!(pair.warning_at, t0() + TimeDelta::minutes(38));
        assert_eq!(
            s.controller().env().subscription_count(ActivitySignalKind::Click),
            1,
            "no double subscription"
        );
    }

    // ── Timers ──────────────────────────────────────────────────

    #[test]
    fn warning_then_logout() {
        let mut s = sim("/dashboard");

        let changes = s.advance_by(TimeDelta::minutes(8));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].to, SessionPhase::WarningShown);
        assert_eq!(changes[0].cause, ChangeCause::WarningTimer);

        let changes = s.advance_by(TimeDelta::minutes(2));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].from, SessionPhase::WarningShown);
        assert_eq!(
            changes[0].cause,
            ChangeCause::Logout(LogoutReason::IdleTimeout)
        );
        assert_eq!(s.redirects(), ["/login".to_string()]);
        assert_eq!(s.controller().auth().sign_out_calls(), 1);
        assert_eq!(s.controller().env().pending_count(), 0);
        assert_eq!(s.controller().env().active_subscriptions(), 0);
    }

    #[test]
    fn stale_generation_callback_is_ignored() {
        let mut s = sim("/dashboard");
        let old = s.controller().armed().expect("armed").generation;

        s.advance_by(TimeDelta::minutes(1));
        s.signal(ActivitySignalKind::KeyPress);

        // A late callback from the superseded pair.
        let now = s.now();
        let stale = TimerToken::new(TimerKind::Logout, old);
        assert!(s.controller_mut().on_timer(stale, now).is_none());
        let stale = TimerToken::new(TimerKind::Warning, old);
        assert!(s.controller_mut().on_timer(stale, now).is_none());

        assert_eq!(s.controller().phase(), Some(SessionPhase::Idle));
        assert!(s.redirects().is_empty());
    }

    #[test]
    fn session_check_from_previous_attachment_is_ignored() {
        let mut s = sim("/dashboard");
        let old = s
            .controller()
            .env()
            .pending()
            .map(|(_, token)| token)
            .find(|token| token.kind == TimerKind::SessionCheck)
            .expect("session check scheduled");

        s.navigate("/login");
        s.navigate("/dashboard");
        s.controller_mut().auth_mut().set_session(false);

        let now = s.now();
        assert!(s.controller_mut().on_timer(old, now).is_none());
        assert_eq!(s.controller().phase(), Some(SessionPhase::Idle));
        assert!(s.redirects().is_empty());
        assert_eq!(s.controller().auth().check_calls(), 0);
    }

    #[test]
    fn reset_after_logout_does_not_resurrect() {
        let mut s = sim("/dashboard");
        s.advance_by(TimeDelta::minutes(10));
        assert_eq!(s.controller().phase(), Some(SessionPhase::LoggedOut));

        let now = s.now();
        assert!(!s.controller_mut().reset_timers(now));
        assert!(s.controller_mut().stay_logged_in(now).is_none());
        assert!(s.signal(ActivitySignalKind::Click).is_none());

        assert_eq!(s.controller().phase(), Some(SessionPhase::LoggedOut));
        assert!(s.controller().armed().is_none());
        assert_eq!(s.controller().redirects(), 1);
    }

    #[test]
    fn logout_now_is_idempotent() {
        let mut s = sim("/dashboard");
        let now = s.now();
        assert!(s.controller_mut().logout_now(now).is_some());
        assert!(s.controller_mut().logout_now(now).is_none());
        assert_eq!(s.redirects().len(), 1);
    }

    #[test]
    fn unsubscribed_signal_kind_is_ignored() {
        let policy = SessionPolicy::builder(10 * 60_000, 2 * 60_000)
            .activity_signals([ActivitySignalKind::KeyPress])
            .build()
            .expect("valid");
        let mut s = Simulation::new(policy, "/dashboard", t0());
        s.advance_by(TimeDelta::minutes(8));

        assert!(s.signal(ActivitySignalKind::PointerMove).is_none());
        assert_eq!(s.controller().phase(), Some(SessionPhase::WarningShown));

        let change = s.signal(ActivitySignalKind::KeyPress).expect("reset");
        assert_eq!(change.to, SessionPhase::Idle);
    }

    // ── Collaborator failures ───────────────────────────────────

    #[test]
    fn sign_out_failure_still_redirects() {
        let mut auth = MemoryAuth::signed_in();
        auth.fail_sign_out(true);
        let mut s = Simulation::with_auth(short_policy(), "/dashboard", auth, t0());

        s.advance_by(TimeDelta::minutes(10));

        assert_eq!(s.controller().phase(), Some(SessionPhase::LoggedOut));
        assert_eq!(s.redirects(), ["/login".to_string()]);
        let incidents = s.controller().incidents();
        assert_eq!(incidents.count(IncidentKind::SignOutFailure), 1);
        assert_eq!(
            incidents.latest().map(|i| i.at),
            Some(t0() + TimeDelta::minutes(10))
        );
    }

    #[test]
    fn session_check_failure_is_not_logout() {
        let mut auth = MemoryAuth::signed_in();
        auth.fail_next_checks(3);
        let mut s = Simulation::with_auth(short_policy(), "/dashboard", auth, t0());

        s.advance_by(TimeDelta::minutes(4));

        assert_eq!(s.controller().phase(), Some(SessionPhase::Idle));
        assert!(s.redirects().is_empty());
        assert_eq!(
            s.controller().incidents().count(IncidentKind::SessionCheckFailure),
            3
        );
        assert_eq!(s.controller().auth().check_calls(), 4);
        assert_eq!(s.controller().snapshot(s.now()).session_last_known, Some(true));
    }

    #[test]
    fn missing_session_logs_out_during_warning() {
        let mut s = sim("/dashboard");
        s.advance_by(TimeDelta::minutes(8));
        assert_eq!(s.controller().phase(), Some(SessionPhase::WarningShown));

        s.controller_mut().auth_mut().set_session(false);
        let changes = s.advance_by(TimeDelta::minutes(1));

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].cause,
            ChangeCause::Logout(LogoutReason::SessionMissing)
        );
        assert_eq!(s.redirects().len(), 1);
    }

    // ── Reconfigure / dispose ───────────────────────────────────

    #[test]
    fn reconfigure_rearms_from_now() {
        let mut s = sim("/dashboard");
        s.advance_by(TimeDelta::minutes(5));

        let policy = SessionPolicy::builder(60 * 60_000, 10 * 60_000)
            .build()
            .expect("valid");
        let now = s.now();
        assert_eq!(
            s.controller_mut().reconfigure(policy, now),
            NavigationOutcome::Unchanged
        );

        let pair = s.controller().armed().expect("armed");
        assert_eq!(pair.warning_at, now + TimeDelta::minutes(50));
        assert_eq!(s.controller().env().active_subscriptions(), 7);
    }

    #[test]
    fn reconfigure_can_exclude_current_path() {
        let mut s = sim("/kiosk");
        let policy = SessionPolicy::builder(10 * 60_000, 60_000)
            .excluded_paths(["/kiosk"])
            .build()
            .expect("valid");
        let now = s.now();
        assert_eq!(
            s.controller_mut().reconfigure(policy, now),
            NavigationOutcome::Detached
        );
        assert_eq!(s.controller().env().pending_count(), 0);
    }

    #[test]
    fn dispose_returns_collaborators_clean() {
        let host = ManualHost::new(t0());
        let mut controller = SessionController::new(
            short_policy(),
            host,
            MemoryAuth::signed_in(),
            MemoryNavigator::new("/dashboard"),
        );
        controller.sync_navigation(t0());

        let (host, auth, nav) = controller.dispose();

        assert_eq!(host.pending_count(), 0);
        assert_eq!(host.active_subscriptions(), 0);
        assert_eq!(auth.sign_out_calls(), 0);
        assert!(nav.redirects().is_empty());
    }

    // ── Presentation ─────────────────────────────────────────────

    #[test]
    fn warning_view_counts_down() {
        let mut s = sim("/dashboard");
        assert!(s.controller().warning_view(s.now()).is_none());

        s.advance_by(TimeDelta::minutes(8) + TimeDelta::seconds(30));
        let view = s.controller().warning_view(s.now()).expect("warning up");
        assert_eq!(view.countdown, "01:30");
        assert_eq!(view.remaining_ms, 90_000);
    }

    #[test]
    fn snapshot_serializes() {
        let s = sim("/dashboard");
        let snapshot = s.controller().snapshot(s.now());
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["path"], "/dashboard");
        assert_eq!(json["redirects"], 0);
    }
}
