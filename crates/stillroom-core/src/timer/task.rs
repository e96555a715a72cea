//! Cancellable scheduled tasks on the session timeline.
//!
//! Session time is counted in whole units (one unit per clock tick) since the
//! session started. A scheduled task is only an optional due instant, so
//! cancelling it clears the instant and nothing stale can fire later.

use serde::{Deserialize, Serialize};

/// A one-shot task, e.g. "hide the prompt in 5 units".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeout {
    due: Option<u64>,
}

impl Timeout {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)schedule to fire `after` units from `now`.
    pub fn schedule(&mut self, now: u64, after: u64) {
        self.due = Some(now.saturating_add(after));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<u64> {
        self.due
    }

    /// Returns `true` exactly once, on the first poll at or after the due
    /// instant. The task is cleared when it fires.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// A repeating task with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    period: u64,
    next: Option<u64>,
}

impl Interval {
    /// Period is clamped to at least one unit.
    pub fn new(period: u64) -> Self {
        Self {
            period: period.max(1),
            next: None,
        }
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    /// Start (or restart) the interval; first fire is one period after `now`.
    pub fn start(&mut self, now: u64) {
        self.next = Some(now.saturating_add(self.period));
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.next
    }

    /// Returns `true` when the interval is due at `now` and schedules the
    /// following fire one period later.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.next {
            Some(due) if due <= now => {
                self.next = Some(due.saturating_add(self.period));
                true
            }
            _ => false,
        }
    }
}
