//! Tokio-backed host environment.
//!
//! Every scheduled timer is a spawned sleep task that sends its token back
//! over an unbounded channel; the watch loop feeds those tokens to the
//! controller. Cancelling aborts the task. Stale deliveries that slip past an
//! abort are filtered by the controller's generation check.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use idleguard_core::{ActivitySignalKind, HostEnvironment, TimerHandle, TimerToken};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub token: TimerToken,
}

/// Wall clock pinned to tokio's monotonic clock, so paused-time tests see a
/// consistent `now`.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    wall: DateTime<Utc>,
    mono: Instant,
}

impl HostClock {
    pub fn start() -> Self {
        Self::anchored(Utc::now())
    }

    pub fn anchored(wall: DateTime<Utc>) -> Self {
        Self {
            wall,
            mono: Instant::now(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.mono);
        let delta = TimeDelta::from_std(elapsed).unwrap_or(TimeDelta::MAX);
        self.wall.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

pub struct TokioHost {
    clock: HostClock,
    tx: mpsc::UnboundedSender<FiredTimer>,
    tasks: HashMap<u64, JoinHandle<()>>,
    next_handle: u64,
    subscribed: BTreeSet<ActivitySignalKind>,
}

impl TokioHost {
    /// Must be called from within a tokio runtime.
    pub fn new(clock: HostClock) -> (Self, mpsc::UnboundedReceiver<FiredTimer>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let host = Self {
            clock,
            tx,
            tasks: HashMap::new(),
            next_handle: 0,
            subscribed: BTreeSet::new(),
        };
        (host, rx)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Forget a delivered timer's task.
    pub fn fired(&mut self, handle: TimerHandle) {
        self.tasks.remove(&handle.0);
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_subscribed(&self, kind: ActivitySignalKind) -> bool {
        self.subscribed.contains(&kind)
    }
}

impl HostEnvironment for TokioHost {
    fn schedule(&mut self, delay_ms: u64, token: TimerToken) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            // Receiver gone means the session loop has exited.
            let _ = tx.send(FiredTimer { handle, token });
        });
        self.tasks.insert(handle.0, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle.0) {
            task.abort();
        }
    }

    fn subscribe(&mut self, kind: ActivitySignalKind) {
        self.subscribed.insert(kind);
    }

    fn unsubscribe(&mut self, kind: ActivitySignalKind) {
        self.subscribed.remove(&kind);
    }
}

impl Drop for TokioHost {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
