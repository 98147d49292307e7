//! Request throttle shared by the API clients.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Keeps consecutive requests at least `min_interval` apart.
///
/// Each call to [`Throttle::acquire`] reserves the next free slot, so two
/// callers queued behind the same lock are spaced out rather than released
/// together.
#[derive(Debug)]
pub struct Throttle {
    /// Minimum spacing between requests.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_slot: Option<Instant>,
}

impl Throttle {
    /// Creates a throttle with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Waits for the next free slot and reserves the following one.
    pub async fn acquire(&mut self) {
        let now = Instant::now();
        let slot = self.next_slot.map_or(now, |reserved| reserved.max(now));
        if slot > now {
            sleep_until(slot).await;
        }
        self.next_slot = slot.checked_add(self.min_interval);
    }
}
