//! `Debouncer` - delays a value until it stops changing.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// A value waiting for its countdown to elapse.
#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Delays propagation of a value until `delay` has passed without a change.
///
/// [`schedule`](Self::schedule) arms the countdown and
/// [`committed`](Self::committed) resolves once it elapses. Commits are only
/// ever produced by polling `committed`, never from inside `schedule`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    /// Most recently scheduled value, committed or not.
    last: Option<T>,
    pending: Option<Pending<T>>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Creates an idle debouncer.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            last: None,
            pending: None,
        }
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` while a value is waiting for its countdown.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedules `value`, restarting the countdown if it differs from the
    /// last scheduled value. Re-scheduling the same value is a no-op.
    pub fn schedule(&mut self, value: T) {
        if self.last.as_ref() == Some(&value) {
            return;
        }
        let now = Instant::now();
        let deadline = now.checked_add(self.delay).unwrap_or(now);
        self.last = Some(value.clone());
        self.pending = Some(Pending { value, deadline });
    }

    /// Discards the pending value, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last = None;
    }

    /// Waits for the pending value to settle and returns it.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: dropping the
    /// future before it resolves leaves the pending value in place.
    pub async fn committed(&mut self) -> T {
        let Some(deadline) = self.pending.as_ref().map(|pending| pending.deadline) else {
            return std::future::pending().await;
        };
        sleep_until(deadline).await;
        match self.pending.take() {
            Some(pending) => pending.value,
            None => std::future::pending().await,
        }
    }
}
