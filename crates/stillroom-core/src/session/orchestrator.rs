//! Meditation session state machine.
//!
//! Composes the countdown, breath cycle and prompt scheduler into one screen
//! state machine. Like the rest of the timer code it has no internal thread:
//! the caller invokes [`MeditationSession::tick`] once per time unit and every
//! command returns the events it produced.
//!
//! ## State Transitions
//!
//! ```text
//! Active <-> Paused
//! Active -> Completed -> MoodCaptured
//! (Active | Paused) -> Exited
//! ```
//!
//! Every transition out of `Active` cancels all pending timers before
//! returning, so nothing scheduled earlier can fire against the new state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::audio::AmbiencePlayer;
use super::config::SessionConfig;
use super::record::{format_clock, CompletedSession, Mood, SessionSummary};
use crate::error::{PlaybackError, ValidationError};
use crate::events::Event;
use crate::timer::{
    BreathCycle, BreathPhase, Countdown, CountdownEvent, PhaseChange, PromptEvent,
    PromptScheduler, PROMPT_VISIBLE_SECS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Paused,
    Completed,
    MoodCaptured,
    Exited,
}

impl SessionState {
    /// Whether the session still consumes clock ticks.
    pub fn is_live(self) -> bool {
        matches!(self, SessionState::Active | SessionState::Paused)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::MoodCaptured | SessionState::Exited)
    }
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub state: SessionState,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub is_running: bool,
    pub is_completed: bool,
    pub breath_phase: BreathPhase,
    pub current_prompt: Option<String>,
    pub is_muted: bool,
    pub ambience_id: String,
}

impl SessionSnapshot {
    pub fn display_time(&self) -> String {
        format_clock(self.remaining_secs)
    }

    /// 0.0 .. 100.0
    pub fn progress_pct(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        let elapsed = self.total_secs - self.remaining_secs;
        (elapsed as f64 / self.total_secs as f64 * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioState {
    /// Never started (e.g. session began muted).
    Idle,
    Playing,
    Paused,
    /// Playback failed once; the session stays silent.
    Failed,
    Released,
}

pub struct MeditationSession<P: AmbiencePlayer> {
    id: Uuid,
    config: SessionConfig,
    state: SessionState,
    /// Time units elapsed since start, paused time included.
    now: u64,
    countdown: Countdown,
    breath: BreathCycle,
    prompts: PromptScheduler,
    muted: bool,
    player: P,
    audio: AudioState,
    record: Option<CompletedSession>,
}

impl<P: AmbiencePlayer> MeditationSession<P> {
    /// Start a session. Returns the session together with its opening events
    /// (start, first breath phase, first prompt).
    pub fn start(config: SessionConfig, player: P) -> Result<(Self, Vec<Event>), ValidationError> {
        if config.duration_secs() == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        let prompts = PromptScheduler::new(config.prompts().to_vec(), config.seed())?;
        let mut session = Self {
            id: Uuid::new_v4(),
            muted: config.start_muted(),
            config,
            state: SessionState::Active,
            now: 0,
            countdown: Countdown::new(),
            breath: BreathCycle::new(),
            prompts,
            player,
            audio: AudioState::Idle,
            record: None,
        };

        info!(
            session_id = %session.id,
            duration_secs = session.config.duration_secs(),
            ambience = %session.config.ambience().id,
            "meditation session started"
        );

        let mut events = vec![Event::SessionStarted {
            session_id: session.id,
            duration_secs: session.config.duration_secs(),
            ambience_id: session.config.ambience().id.clone(),
            muted: session.muted,
            at: Utc::now(),
        }];
        session.countdown.start(0, session.config.duration_secs());
        events.push(phase_event(session.breath.start(0)));
        events.extend(session.prompts.start(0).into_iter().map(prompt_event));
        if !session.muted {
            events.extend(session.sound_on());
        }
        Ok((session, events))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn breath_phase(&self) -> BreathPhase {
        self.breath.phase()
    }

    pub fn current_prompt(&self) -> Option<&str> {
        self.prompts.current()
    }

    /// The completion record, once the countdown has reached zero.
    pub fn record(&self) -> Option<&CompletedSession> {
        self.record.as_ref()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            state: self.state,
            remaining_secs: self.countdown.remaining_secs(),
            total_secs: self.countdown.total_secs(),
            is_running: self.state == SessionState::Active,
            is_completed: self.countdown.is_completed(),
            breath_phase: self.breath.phase(),
            current_prompt: self.prompts.current().map(str::to_owned),
            is_muted: self.muted,
            ambience_id: self.config.ambience().id.clone(),
        }
    }

    /// Snapshot wrapped as an event for streaming front ends.
    pub fn snapshot_event(&self) -> Event {
        let snap = self.snapshot();
        Event::StateSnapshot {
            state: snap.state,
            remaining_secs: snap.remaining_secs,
            total_secs: snap.total_secs,
            display_time: snap.display_time(),
            breath_phase: snap.breath_phase,
            progress_pct: snap.progress_pct(),
            prompt: snap.current_prompt,
            muted: snap.is_muted,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance one time unit.
    ///
    /// The countdown is evaluated first; if it completes, the session
    /// transitions to `Completed` within this call and the other timers do not
    /// run.
    pub fn tick(&mut self) -> Vec<Event> {
        self.now += 1;
        let mut events = Vec::new();
        if self.state != SessionState::Active {
            return events;
        }

        for event in self.countdown.on_tick(self.now) {
            match event {
                CountdownEvent::Tick { remaining_secs } => {
                    events.push(Event::CountdownTick { remaining_secs });
                }
                CountdownEvent::Completed => {
                    events.extend(self.complete());
                    return events;
                }
            }
        }
        if let Some(change) = self.breath.on_tick(self.now) {
            events.push(phase_event(change));
        }
        events.extend(self.prompts.on_tick(self.now).into_iter().map(prompt_event));
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if self.state != SessionState::Active {
            return Vec::new();
        }
        self.countdown.pause();
        self.breath.stop();
        let mut events: Vec<Event> = self.prompts.stop().into_iter().map(prompt_event).collect();
        self.sound_off();
        self.state = SessionState::Paused;
        debug!(remaining_secs = self.remaining_secs(), "session paused");

        events.push(Event::SessionPaused {
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        });
        events
    }

    pub fn resume(&mut self) -> Vec<Event> {
        if self.state != SessionState::Paused {
            return Vec::new();
        }
        self.state = SessionState::Active;
        self.countdown.resume(self.now);
        debug!(remaining_secs = self.remaining_secs(), "session resumed");

        let mut events = vec![Event::SessionResumed {
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }];
        events.push(phase_event(self.breath.start(self.now)));
        events.extend(self.prompts.start(self.now).into_iter().map(prompt_event));
        if !self.muted {
            events.extend(self.sound_on());
        }
        events
    }

    /// Flip pause/resume, as the play/pause button does.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        match self.state {
            SessionState::Active => self.pause(),
            SessionState::Paused => self.resume(),
            _ => Vec::new(),
        }
    }

    /// Only honoured while `Active`; the mute control is disabled during pause.
    pub fn toggle_mute(&mut self) -> Vec<Event> {
        if self.state != SessionState::Active {
            return Vec::new();
        }
        self.muted = !self.muted;
        let mut events = Vec::new();
        if self.muted {
            self.sound_off();
        } else {
            events.extend(self.sound_on());
        }
        events.push(Event::MuteToggled { muted: self.muted });
        events
    }

    /// Abort the session. Requires `confirmed`; never persists a record.
    pub fn exit(&mut self, confirmed: bool) -> Vec<Event> {
        if !confirmed || !self.state.is_live() {
            return Vec::new();
        }
        let mut events = self.halt();
        self.state = SessionState::Exited;
        info!(remaining_secs = self.remaining_secs(), "meditation session exited");

        events.push(Event::SessionExited {
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        });
        events
    }

    /// Attach the post-session mood. Only valid from `Completed`.
    pub fn select_mood(&mut self, mood: Mood) -> Option<SessionSummary> {
        if self.state != SessionState::Completed {
            return None;
        }
        let record = self.record.as_mut()?;
        record.mood_after = Some(mood);
        self.state = SessionState::MoodCaptured;
        debug!(%mood, "mood captured");

        Some(SessionSummary {
            duration_secs: record.duration_secs,
            ambience_name: record.ambience_name.clone(),
            mood,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Vec<Event> {
        if self.record.is_some() {
            return Vec::new();
        }
        let mut events = self.halt();
        self.state = SessionState::Completed;

        let record = CompletedSession {
            session_id: self.id,
            duration_secs: self.config.duration_secs(),
            ambience_id: self.config.ambience().id.clone(),
            ambience_name: self.config.ambience().name.clone(),
            completed_at: Utc::now(),
            mood_after: None,
        };
        info!(session_id = %self.id, "meditation session completed");
        self.record = Some(record.clone());

        events.push(Event::SessionCompleted {
            record,
            mood_choices: Mood::ALL.to_vec(),
        });
        events
    }

    /// Cancel every timer and release the audio.
    fn halt(&mut self) -> Vec<Event> {
        self.countdown.stop();
        self.breath.stop();
        let events = self.prompts.stop().into_iter().map(prompt_event).collect();
        if matches!(self.audio, AudioState::Playing | AudioState::Paused) {
            self.player.stop();
        }
        if self.audio != AudioState::Failed {
            self.audio = AudioState::Released;
        }
        events
    }

    fn sound_on(&mut self) -> Option<Event> {
        let result = match self.audio {
            AudioState::Idle => self
                .player
                .play(self.config.ambience(), self.config.volume()),
            AudioState::Paused => self.player.resume(),
            AudioState::Playing | AudioState::Failed | AudioState::Released => return None,
        };
        match result {
            Ok(()) => {
                self.audio = AudioState::Playing;
                None
            }
            Err(e) => Some(self.playback_failed(e)),
        }
    }

    fn sound_off(&mut self) {
        if self.audio == AudioState::Playing {
            self.player.pause();
            self.audio = AudioState::Paused;
        }
    }

    fn playback_failed(&mut self, error: PlaybackError) -> Event {
        warn!(error = %error, "ambience playback failed; continuing without audio");
        self.audio = AudioState::Failed;
        Event::AmbienceUnavailable {
            message: error.to_string(),
        }
    }
}

fn phase_event(change: PhaseChange) -> Event {
    Event::BreathPhaseChanged {
        phase: change.phase,
        duration_secs: change.duration_secs,
    }
}

fn prompt_event(event: PromptEvent) -> Event {
    match event {
        PromptEvent::Shown { text } => Event::PromptShown {
            text,
            visible_secs: PROMPT_VISIBLE_SECS,
        },
        PromptEvent::Hidden => Event::PromptHidden,
    }
}
