use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{CompletedSession, Mood, SessionState, SessionSummary};
use crate::timer::BreathPhase;

/// Every observable change of a meditation session produces an Event.
/// The view layer renders from these; the runner persists on completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        duration_secs: u64,
        ambience_id: String,
        muted: bool,
        at: DateTime<Utc>,
    },
    CountdownTick {
        remaining_secs: u64,
    },
    BreathPhaseChanged {
        phase: BreathPhase,
        duration_secs: u64,
    },
    PromptShown {
        text: String,
        visible_secs: u64,
    },
    PromptHidden,
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    MuteToggled {
        muted: bool,
    },
    /// Ambience could not be played; the session continues without audio.
    AmbienceUnavailable {
        message: String,
    },
    /// Countdown reached zero. Carries the record to persist and the mood
    /// choices to offer.
    SessionCompleted {
        record: CompletedSession,
        mood_choices: Vec<Mood>,
    },
    MoodCaptured {
        summary: SessionSummary,
        at: DateTime<Utc>,
    },
    SessionExited {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        remaining_secs: u64,
        total_secs: u64,
        display_time: String,
        breath_phase: BreathPhase,
        prompt: Option<String>,
        muted: bool,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Timer-driven events that must never be observed while paused.
    pub fn is_timer_event(&self) -> bool {
        matches!(
            self,
            Event::CountdownTick { .. }
                | Event::BreathPhaseChanged { .. }
                | Event::PromptShown { .. }
        )
    }
}
