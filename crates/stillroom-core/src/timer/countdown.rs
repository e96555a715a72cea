//! Countdown controller.
//!
//! Counts a session down one second per tick while running. Completion is
//! reported exactly once, after which the countdown stops itself.

use serde::{Deserialize, Serialize};

use super::task::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CountdownEvent {
    Tick { remaining_secs: u64 },
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    total_secs: u64,
    remaining_secs: u64,
    ticker: Interval,
    started: bool,
    completed: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            total_secs: 0,
            remaining_secs: 0,
            ticker: Interval::new(1),
            started: false,
            completed: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down from `duration_secs`.
    ///
    /// If already running only the duration is reset; the tick phase is kept.
    /// A zero duration completes immediately.
    pub fn start(&mut self, now: u64, duration_secs: u64) -> Option<CountdownEvent> {
        self.total_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.started = true;
        self.completed = false;

        if duration_secs == 0 {
            self.ticker.cancel();
            self.completed = true;
            return Some(CountdownEvent::Completed);
        }
        if !self.ticker.is_running() {
            self.ticker.start(now);
        }
        None
    }

    /// Returns `false` when there was nothing to pause.
    pub fn pause(&mut self) -> bool {
        if !self.ticker.is_running() {
            return false;
        }
        self.ticker.cancel();
        true
    }

    /// Continue from the frozen remaining time; the next tick lands one full
    /// unit after `now`.
    pub fn resume(&mut self, now: u64) -> bool {
        if !self.started || self.completed || self.ticker.is_running() {
            return false;
        }
        self.ticker.start(now);
        true
    }

    pub fn stop(&mut self) {
        self.ticker.cancel();
    }

    /// Advance the countdown to `now`.
    pub fn on_tick(&mut self, now: u64) -> Vec<CountdownEvent> {
        let mut events = Vec::new();
        if self.completed || !self.ticker.poll(now) {
            return events;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        events.push(CountdownEvent::Tick {
            remaining_secs: self.remaining_secs,
        });

        if self.remaining_secs == 0 {
            self.completed = true;
            self.ticker.cancel();
            events.push(CountdownEvent::Completed);
        }
        events
    }
}
