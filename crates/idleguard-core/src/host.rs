//! Host environment seam: timer scheduling and signal subscription.

use crate::timer::{TimerHandle, TimerToken};
use crate::types::ActivitySignalKind;

/// Facilities the hosting context provides. Enables mock injection for testing.
///
/// Scheduling must not block: the host delivers the token back later by
/// calling [`SessionController::on_timer`](crate::SessionController::on_timer).
/// `cancel` on an already fired or unknown handle is a no-op.
pub trait HostEnvironment {
    fn schedule(&mut self, delay_ms: u64, token: TimerToken) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
    fn subscribe(&mut self, kind: ActivitySignalKind);
    fn unsubscribe(&mut self, kind: ActivitySignalKind);
}

impl<T: HostEnvironment + ?Sized> HostEnvironment for &mut T {
    fn schedule(&mut self, delay_ms: u64, token: TimerToken) -> TimerHandle {
        (**self).schedule(delay_ms, token)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        (**self).cancel(handle);
    }

    fn subscribe(&mut self, kind: ActivitySignalKind) {
        (**self).subscribe(kind);
    }

    fn unsubscribe(&mut self, kind: ActivitySignalKind) {
        (**self).unsubscribe(kind);
    }
}
