//! Activity monitor: signal subscriptions for the life of an attachment.

use std::collections::BTreeSet;

use crate::host::HostEnvironment;
use crate::types::ActivitySignalKind;

/// Tracks which signal kinds are subscribed on the host.
///
/// `attach` and `detach` are idempotent: a kind is subscribed at most once,
/// and detaching twice unsubscribes nothing the second time.
#[derive(Debug, Default)]
pub struct ActivityMonitor {
    subscribed: BTreeSet<ActivitySignalKind>,
}

impl ActivityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach<H>(&mut self, host: &mut H, kinds: &BTreeSet<ActivitySignalKind>)
    where
        H: HostEnvironment + ?Sized,
    {
        for &kind in kinds {
            if self.subscribed.insert(kind) {
                host.subscribe(kind);
            }
        }
    }

    pub fn detach<H>(&mut self, host: &mut H)
    where
        H: HostEnvironment + ?Sized,
    {
        for kind in std::mem::take(&mut self.subscribed) {
            host.unsubscribe(kind);
        }
    }

    pub fn is_attached(&self) -> bool {
        !self.subscribed.is_empty()
    }

    /// Whether a delivered signal of `kind` counts as activity right now.
    pub fn accepts(&self, kind: ActivitySignalKind) -> bool {
        self.subscribed.contains(&kind)
    }

    pub fn subscribed(&self) -> impl Iterator<Item = ActivitySignalKind> + '_ {
        self.subscribed.iter().copied()
    }
}
