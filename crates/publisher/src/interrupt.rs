//! Interrupt flag and cancellable sleep.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::sync::Notify;

/// Cooperative interrupt flag shared between a publisher and its controller.
///
/// The flag is sticky: once raised it stays raised until [`clear`](Self::clear)
/// is called. Every wait inside the publisher goes through
/// [`sleep_or_interrupted`](Self::sleep_or_interrupted), so raising the flag
/// promptly wakes all pending sleeps.
#[derive(Clone, Debug, Default)]
pub struct InterruptFlag {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    raised: AtomicBool,
    notify: Notify,
}

impl InterruptFlag {
    /// Creates a lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag and wakes every pending sleep. Idempotent.
    pub fn interrupt(&self) {
        self.inner.raised.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Lowers the flag, allowing the next publish to proceed.
    pub fn clear(&self) {
        self.inner.raised.store(false, Ordering::SeqCst);
    }

    /// Whether the flag is currently raised.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.inner.raised.load(Ordering::SeqCst)
    }

    /// Sleeps for `duration` or until the flag is raised, whichever comes
    /// first.
    ///
    /// Returns `true` when the flag is raised, whether it cut the sleep
    /// short or was already up.
    pub async fn sleep_or_interrupted(&self, duration: Duration) -> bool {
        // Arm the waiter before re-checking the flag so an interrupt cannot
        // slip between the check and the wait.
        let notified = self.inner.notify.notified();
        if self.is_interrupted() {
            return true;
        }
        tokio::select! {
            _ = notified => true,
            _ = tokio::time::sleep(duration) => self.is_interrupted(),
        }
    }
}
