//! Async driver for a [`MeditationSession`].
//!
//! Pumps clock ticks and user commands into the state machine from a single
//! task, forwards every event to the view layer, and performs the
//! best-effort backend writes on completion and mood selection. Write
//! failures are logged and never block the session flow.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::audio::AmbiencePlayer;
use super::orchestrator::{MeditationSession, SessionState};
use super::record::{CompletedSession, Mood, SessionSummary};
use crate::api::{DurationUnit, LogRequest, MeditationLogApi, MoodRequest};
use crate::events::Event;
use crate::timer::TickSource;

/// User controls available on the session screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    TogglePause,
    ToggleMute,
    Exit { confirmed: bool },
    SelectMood(Mood),
    /// Emit a `StateSnapshot` of the current session.
    Snapshot,
}

/// How a session handed control back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Completed and the user picked a mood.
    MoodCaptured(SessionSummary),
    /// Completed, but input ended before a mood was picked.
    Completed(CompletedSession),
    /// User confirmed exit before completion.
    Exited { remaining_secs: u64 },
    /// Clock and command input both closed before completion.
    Abandoned { remaining_secs: u64 },
}

enum Input {
    Command(Option<SessionCommand>),
    Tick(Option<()>),
    Idle,
}

pub struct SessionRunner<P: AmbiencePlayer, A: MeditationLogApi> {
    session: MeditationSession<P>,
    api: A,
    user_id: Option<String>,
    duration_unit: DurationUnit,
    auto_mood: Option<Mood>,
    events: mpsc::UnboundedSender<Event>,
    log_id: Option<String>,
}

impl<P: AmbiencePlayer, A: MeditationLogApi> SessionRunner<P, A> {
    /// Wrap a started session. `events` receives every event produced, in
    /// order; the opening events returned by `MeditationSession::start` are
    /// the caller's to forward.
    pub fn new(session: MeditationSession<P>, api: A, events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            session,
            api,
            user_id: None,
            duration_unit: DurationUnit::default(),
            auto_mood: None,
            events,
            log_id: None,
        }
    }

    /// Without a user id nothing is written to the backend.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_duration_unit(mut self, unit: DurationUnit) -> Self {
        self.duration_unit = unit;
        self
    }

    /// Select this mood automatically as soon as the session completes.
    pub fn with_auto_mood(mut self, mood: Mood) -> Self {
        self.auto_mood = Some(mood);
        self
    }

    pub fn session(&self) -> &MeditationSession<P> {
        &self.session
    }

    /// Run until the session reaches a point where control returns to the
    /// caller.
    pub async fn run<C: TickSource>(
        mut self,
        mut clock: C,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> SessionOutcome {
        let mut clock_open = true;
        let mut commands_open = true;

        loop {
            if let Some(outcome) = self.outcome() {
                return outcome;
            }
            let live = self.session.state().is_live();

            // Commands first: a pause that arrives together with a tick wins.
            let input = tokio::select! {
                biased;
                cmd = commands.recv(), if commands_open => Input::Command(cmd),
                tick = clock.next_tick(), if clock_open && live => Input::Tick(tick),
                else => Input::Idle,
            };

            match input {
                Input::Command(Some(cmd)) => {
                    self.handle_command(cmd, &mut clock).await;
                }
                Input::Command(None) => {
                    commands_open = false;
                    if self.session.state() == SessionState::Paused {
                        debug!("command input closed while paused; exiting");
                        let events = self.session.exit(true);
                        self.emit_all(events);
                    }
                }
                Input::Tick(Some(())) => {
                    let events = self.session.tick();
                    self.dispatch(events).await;
                }
                Input::Tick(None) => {
                    clock_open = false;
                }
                Input::Idle => return self.fallback_outcome(),
            }
        }
    }

    async fn handle_command<C: TickSource>(&mut self, cmd: SessionCommand, clock: &mut C) {
        let was_paused = self.session.state() == SessionState::Paused;
        let events = match cmd {
            SessionCommand::Pause => self.session.pause(),
            SessionCommand::Resume => self.session.resume(),
            SessionCommand::TogglePause => self.session.toggle_pause(),
            SessionCommand::ToggleMute => self.session.toggle_mute(),
            SessionCommand::Exit { confirmed } => self.session.exit(confirmed),
            SessionCommand::SelectMood(mood) => {
                self.select_mood(mood).await;
                return;
            }
            SessionCommand::Snapshot => {
                self.emit(self.session.snapshot_event());
                return;
            }
        };
        if was_paused && self.session.state() == SessionState::Active {
            clock.reset();
        }
        if events.is_empty() {
            debug!(?cmd, state = ?self.session.state(), "command ignored in current state");
        }
        self.dispatch(events).await;
    }

    /// Forward events, persisting the completion record when one appears.
    async fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            let completed = match &event {
                Event::SessionCompleted { record, .. } => Some(record.clone()),
                _ => None,
            };
            self.emit(event);
            if let Some(record) = completed {
                self.persist_completion(&record).await;
                if let Some(mood) = self.auto_mood {
                    self.select_mood(mood).await;
                }
            }
        }
    }

    async fn select_mood(&mut self, mood: Mood) {
        let Some(summary) = self.session.select_mood(mood) else {
            debug!(%mood, state = ?self.session.state(), "mood selection ignored");
            return;
        };
        self.persist_mood(mood).await;
        self.emit(Event::MoodCaptured {
            summary,
            at: chrono::Utc::now(),
        });
    }

    async fn persist_completion(&mut self, record: &CompletedSession) {
        let Some(user_id) = self.user_id.as_deref() else {
            debug!("no user configured; completed session not logged");
            return;
        };
        let request = LogRequest::from_record(user_id, record, self.duration_unit);
        match self.api.log_session(&request).await {
            Ok(log_id) => {
                info!(%log_id, "meditation session logged");
                self.log_id = Some(log_id);
            }
            Err(e) => warn!(error = %e, "failed to log meditation session"),
        }
    }

    async fn persist_mood(&mut self, mood: Mood) {
        if self.user_id.is_none() {
            return;
        }
        let Some(log_id) = self.log_id.clone() else {
            warn!(%mood, "no logged session to attach mood to; skipping");
            return;
        };
        let request = MoodRequest { log_id, mood };
        if let Err(e) = self.api.log_mood(&request).await {
            warn!(error = %e, "failed to log post-session mood");
        }
    }

    fn outcome(&self) -> Option<SessionOutcome> {
        if !self.session.state().is_terminal() {
            return None;
        }
        match self.session.state() {
            SessionState::MoodCaptured => {
                let record = self.session.record()?;
                Some(SessionOutcome::MoodCaptured(SessionSummary {
                    duration_secs: record.duration_secs,
                    ambience_name: record.ambience_name.clone(),
                    mood: record.mood_after?,
                }))
            }
            SessionState::Exited => Some(SessionOutcome::Exited {
                remaining_secs: self.session.remaining_secs(),
            }),
            _ => None,
        }
    }

    fn fallback_outcome(&self) -> SessionOutcome {
        match self.session.record() {
            Some(record) => SessionOutcome::Completed(record.clone()),
            None => SessionOutcome::Abandoned {
                remaining_secs: self.session.remaining_secs(),
            },
        }
    }

    fn emit(&self, event: Event) {
        // The view may have gone away; the session carries on regardless.
        let _ = self.events.send(event);
    }

    fn emit_all(&self, events: Vec<Event>) {
        events.into_iter().for_each(|e| self.emit(e));
    }
}
