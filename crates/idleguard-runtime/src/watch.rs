//! `idleguard watch`: the controller on a tokio event loop.
//!
//! One `select!` loop multiplexes the JSON-lines input, fired timers, a 1 Hz
//! countdown tick and shutdown. After every step the route is re-synced so a
//! redirect (or a `navigate` event) attaches or detaches the guard.

use std::future::Future;
use std::time::Duration;

use idleguard_core::{
    NavigationOutcome, Navigator, PhaseChange, SessionController, SessionPhase, SessionPolicy,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::MissedTickBehavior;

use crate::auth::FileSessionStore;
use crate::events::{InputEvent, OutputEvent};
use crate::host::{FiredTimer, HostClock, TokioHost};
use crate::navigation::RouteState;

pub type RuntimeController = SessionController<TokioHost, FileSessionStore, RouteState>;

/// Where the session stood when the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSummary {
    /// `None` when detached.
    pub phase: Option<SessionPhase>,
    pub redirects: u64,
    /// Incidents still held in the log.
    pub incidents: usize,
}

/// Runs until `shutdown` resolves, or until the input is closed and the
/// guard is detached or logged out.
#[allow(clippy::too_many_arguments)]
pub async fn run_session<R, W, C, F>(
    policy: SessionPolicy,
    store: FileSessionStore,
    start_path: &str,
    clock: HostClock,
    input: R,
    out: &mut W,
    countdown: &mut C,
    shutdown: F,
) -> anyhow::Result<WatchSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let (host, mut timers) = TokioHost::new(clock);
    let mut controller = SessionController::new(policy, host, store, RouteState::new(start_path));
    tracing::info!(
        path = start_path,
        session_file = %controller.auth().path().display(),
        "watch starting"
    );
    settle(&mut controller, None, out).await?;

    let mut lines = input.lines();
    let mut input_closed = false;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        if input_closed && controller.phase().is_none_or(|p| p.is_terminal()) {
            tracing::debug!("input closed and guard inactive");
            break;
        }

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown requested");
                controller.detach();
                break;
            }
            line = lines.next_line(), if !input_closed => match line? {
                Some(line) => handle_line(&mut controller, &line, out).await?,
                None => {
                    tracing::debug!("input closed");
                    input_closed = true;
                }
            },
            Some(fired) = timers.recv() => {
                handle_timer(&mut controller, fired, out).await?;
            }
            _ = ticker.tick() => {
                render_countdown(&controller, countdown).await?;
            }
        }
    }

    let summary = WatchSummary {
        phase: controller.phase(),
        redirects: controller.redirects(),
        incidents: controller.incidents().len(),
    };
    tracing::info!(
        phase = ?summary.phase,
        redirects = summary.redirects,
        incidents = summary.incidents,
        pending_timers = controller.env().pending_count(),
        "watch stopped"
    );
    Ok(summary)
}

async fn handle_line<W: AsyncWrite + Unpin>(
    controller: &mut RuntimeController,
    line: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    let event = match InputEvent::parse_line(line) {
        None => return Ok(()),
        Some(Ok(event)) => event,
        Some(Err(e)) => {
            tracing::warn!("skipping malformed input line: {e}");
            return Ok(());
        }
    };

    let now = controller.env().now();
    let change = match event {
        InputEvent::Activity { kind } => {
            if controller.env().is_subscribed(kind) {
                controller.on_activity(kind, now)
            } else {
                tracing::debug!(%kind, "no subscription, signal dropped");
                None
            }
        }
        InputEvent::Navigate { path } => {
            controller.navigator_mut().set_path(path);
            None
        }
        InputEvent::Stay => controller.stay_logged_in(now),
        InputEvent::Logout => controller.logout_now(now),
        InputEvent::Status => {
            let snapshot = controller.snapshot(now);
            emit(out, &OutputEvent::Status { snapshot }).await?;
            None
        }
    };
    settle(controller, change, out).await
}

async fn handle_timer<W: AsyncWrite + Unpin>(
    controller: &mut RuntimeController,
    fired: FiredTimer,
    out: &mut W,
) -> anyhow::Result<()> {
    controller.env_mut().fired(fired.handle);
    let now = controller.env().now();
    let change = controller.on_timer(fired.token, now);
    settle(controller, change, out).await
}

/// Report a step's effects and deliver any route change it caused.
async fn settle<W: AsyncWrite + Unpin>(
    controller: &mut RuntimeController,
    change: Option<PhaseChange>,
    out: &mut W,
) -> anyhow::Result<()> {
    if let Some(change) = change {
        emit(out, &OutputEvent::PhaseChange { change }).await?;
    }
    if let Some(path) = controller.navigator_mut().take_redirect() {
        emit(out, &OutputEvent::Redirect { path }).await?;
    }

    let now = controller.env().now();
    let outcome = controller.sync_navigation(now);
    if outcome != NavigationOutcome::Unchanged {
        let path = controller.navigator().current_path();
        emit(out, &OutputEvent::Navigation { path, outcome }).await?;
    }
    Ok(())
}

async fn render_countdown<C: AsyncWrite + Unpin>(
    controller: &RuntimeController,
    countdown: &mut C,
) -> anyhow::Result<()> {
    let Some(view) = controller.warning_view(controller.env().now()) else {
        return Ok(());
    };
    let line = format!("{} Logging out in {}.\n", view.message, view.countdown);
    countdown.write_all(line.as_bytes()).await?;
    countdown.flush().await?;
    Ok(())
}

async fn emit<W: AsyncWrite + Unpin>(out: &mut W, event: &OutputEvent) -> anyhow::Result<()> {
    out.write_all(event.to_line()?.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
