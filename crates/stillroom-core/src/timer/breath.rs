//! Breath phase cycle: in (4) → hold (4) → out (6) → in …

use serde::{Deserialize, Serialize};

use super::task::Timeout;

/// Length of one full in/hold/out cycle.
pub const CYCLE_SECS: u64 = 14;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    #[default]
    In,
    Hold,
    Out,
}

impl BreathPhase {
    pub const fn duration_secs(self) -> u64 {
        match self {
            BreathPhase::In => 4,
            BreathPhase::Hold => 4,
            BreathPhase::Out => 6,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            BreathPhase::In => BreathPhase::Hold,
            BreathPhase::Hold => BreathPhase::Out,
            BreathPhase::Out => BreathPhase::In,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BreathPhase::In => "Breathe in",
            BreathPhase::Hold => "Hold",
            BreathPhase::Out => "Breathe out",
        }
    }

    /// Animation target for the breathing guide.
    pub fn animation(self) -> BreathAnimation {
        let (scale, opacity) = match self {
            BreathPhase::In | BreathPhase::Hold => (1.5, 1.0),
            BreathPhase::Out => (1.0, 0.8),
        };
        BreathAnimation {
            scale,
            opacity,
            duration_secs: self.duration_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreathAnimation {
    pub scale: f32,
    pub opacity: f32,
    pub duration_secs: u64,
}

/// A phase transition, emitted whenever the cycle enters a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub phase: BreathPhase,
    pub duration_secs: u64,
}

impl PhaseChange {
    fn enter(phase: BreathPhase) -> Self {
        Self {
            phase,
            duration_secs: phase.duration_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreathCycle {
    phase: BreathPhase,
    transition: Timeout,
}

impl BreathCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.transition.is_pending()
    }

    /// Begin (or restart) the cycle at "in".
    pub fn start(&mut self, now: u64) -> PhaseChange {
        self.phase = BreathPhase::In;
        self.transition.schedule(now, self.phase.duration_secs());
        PhaseChange::enter(self.phase)
    }

    /// Cancel the pending transition. The current phase is kept for display.
    pub fn stop(&mut self) {
        self.transition.cancel();
    }

    pub fn on_tick(&mut self, now: u64) -> Option<PhaseChange> {
        if !self.transition.poll(now) {
            return None;
        }
        self.phase = self.phase.next();
        self.transition.schedule(now, self.phase.duration_secs());
        Some(PhaseChange::enter(self.phase))
    }
}
