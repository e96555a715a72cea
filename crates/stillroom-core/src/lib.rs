//! # Stillroom Core Library
//!
//! This library provides the core logic for the Stillroom guided meditation
//! timer. The CLI binary is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer**: Tick-driven countdown, breath cycle and prompt scheduler on a
//!   virtual timeline. Nothing here owns a thread; the caller feeds ticks.
//! - **Session**: The session state machine composing the timers, plus an
//!   async runner that drives it from a clock and a command channel
//! - **API**: REST client for the meditation log backend
//! - **History**: Filtering of past sessions, month calendar and day streaks
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`MeditationSession`]: Session state machine
//! - [`SessionRunner`]: Async driver with best-effort backend writes
//! - [`HttpMeditationApi`]: Backend client
//! - [`Config`]: Application configuration management

pub mod api;
pub mod error;
pub mod events;
pub mod history;
pub mod session;
pub mod storage;
pub mod timer;

pub use api::{HttpMeditationApi, MeditationLogApi};
pub use error::{ApiError, ConfigError, CoreError, PlaybackError, ValidationError};
pub use events::Event;
pub use history::{HistoryFilter, MonthCalendar, Streak};
pub use session::{
    AmbienceTrack, MeditationSession, Mood, SessionCommand, SessionConfig, SessionOutcome,
    SessionRunner, SessionState,
};
pub use storage::Config;
pub use timer::{BreathPhase, IntervalClock, TickSource};
