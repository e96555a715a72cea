//! Clock sources that drive a session, one tick per time unit.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Produces ticks for the session runner.
pub trait TickSource {
    /// Wait for the next tick. `None` means the clock is closed and will never
    /// tick again.
    fn next_tick(&mut self) -> impl Future<Output = Option<()>> + Send;

    /// Restart the tick phase so the next tick is a full period away.
    /// Called on resume so a partial second before the pause is not lost.
    fn reset(&mut self) {}
}

/// Wall-clock ticks from a tokio interval.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        // interval() completes its first tick immediately; start one period out.
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl TickSource for IntervalClock {
    async fn next_tick(&mut self) -> Option<()> {
        self.interval.tick().await;
        Some(())
    }

    fn reset(&mut self) {
        self.interval.reset();
    }
}

/// Clock driven by hand through a [`ManualTicker`].
#[derive(Debug)]
pub struct ManualClock {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Handle that pushes ticks into a [`ManualClock`]. Dropping every handle
/// closes the clock.
#[derive(Debug, Clone)]
pub struct ManualTicker {
    tx: mpsc::UnboundedSender<()>,
}

/// Create a connected clock/ticker pair.
pub fn manual_clock() -> (ManualClock, ManualTicker) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualClock { rx }, ManualTicker { tx })
}

impl ManualTicker {
    /// Push one tick. Returns `false` if the clock has been dropped.
    pub fn tick(&self) -> bool {
        self.tx.send(()).is_ok()
    }

    pub fn tick_n(&self, n: u64) -> bool {
        (0..n).all(|_| self.tick())
    }
}

impl TickSource for ManualClock {
    async fn next_tick(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_clock_delivers_pushed_ticks_then_closes() {
        let (mut clock, ticker) = manual_clock();
        assert!(ticker.tick_n(2));
        drop(ticker);
        assert_eq!(clock.next_tick().await, Some(()));
        assert_eq!(clock.next_tick().await, Some(()));
        assert_eq!(clock.next_tick().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_clock_waits_a_full_period_before_first_tick() {
        let start = Instant::now();
        let mut clock = IntervalClock::per_second();
        clock.next_tick().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
        clock.next_tick().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn interval_clock_reset_pushes_next_tick_out() {
        let mut clock = IntervalClock::per_second();
        clock.next_tick().await;
        time::sleep(Duration::from_millis(600)).await;
        let resumed_at = Instant::now();
        clock.reset();
        clock.next_tick().await;
        assert!(resumed_at.elapsed() >= Duration::from_secs(1));
    }
}
