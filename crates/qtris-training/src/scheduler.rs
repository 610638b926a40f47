use std::time::{Duration, Instant};

/// Fixed-period tick source with cooperative pause and cancellation.
///
/// The host polls the clock in its own loop; [`TickClock::poll`]
/// reports at most one due tick per call and reschedules from the
/// moment it fires, so ticks are never buffered. Pausing discards any
/// elapsed time: resuming starts a fresh period rather than replaying
/// ticks that would have fired while paused.
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    next_due: Option<Instant>,
    cancelled: bool,
}

impl TickClock {
    /// Starts a running clock whose first tick is due immediately.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: Some(Instant::now()),
            cancelled: false,
        }
    }

    /// Reports whether a tick is due, consuming it if so.
    pub fn poll(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        let Some(due) = self.next_due else {
            return false;
        };
        let now = Instant::now();
        if now < due {
            return false;
        }
        self.next_due = Some(now + self.period);
        true
    }

    /// Stops the clock; elapsed time toward the next tick is discarded.
    pub fn pause(&mut self) {
        self.next_due = None;
    }

    /// Restarts a paused clock with a full period ahead of the next tick.
    pub fn resume(&mut self) {
        if !self.cancelled && self.next_due.is_none() {
            self.next_due = Some(Instant::now() + self.period);
        }
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        !self.cancelled && self.next_due.is_none()
    }

    /// Permanently stops the clock. A tick already taken from `poll`
    /// runs to completion; there is simply never a next one.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.next_due = None;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
