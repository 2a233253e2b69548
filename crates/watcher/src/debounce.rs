//! Rearmable debounce deadline
//!
//! Prevents running tests for every event in a burst of rapid file changes.
//! A single `Sleep` is reset in place on every arm, so there is never more
//! than one live deadline.

use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, Sleep};

/// Single-shot timer that restarts its quiet period every time it is armed
pub struct DebounceTimer {
    period: Duration,
    /// Created lazily on first arm, then reset in place
    sleep: Option<Pin<Box<Sleep>>>,
    armed: bool,
}

impl DebounceTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            sleep: None,
            armed: false,
        }
    }

    /// Whether a firing is scheduled
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Schedule a firing `period` from now, replacing any earlier deadline
    pub fn arm(&mut self) {
        let deadline = Instant::now() + self.period;
        match self.sleep.as_mut() {
            Some(sleep) => sleep.as_mut().reset(deadline),
            None => self.sleep = Some(Box::pin(tokio::time::sleep_until(deadline))),
        }
        self.armed = true;
    }

    /// Wait for the scheduled firing, consuming it
    ///
    /// Never completes while the timer is disarmed. Cancel-safe: dropping the
    /// future before the deadline leaves the timer armed.
    pub async fn fired(&mut self) {
        if !self.armed {
            return std::future::pending().await;
        }
        if let Some(sleep) = self.sleep.as_mut() {
            sleep.as_mut().await;
        }
        self.armed = false;
    }
}
