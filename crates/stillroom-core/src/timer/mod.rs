mod breath;
mod clock;
mod countdown;
mod prompt;
mod task;

pub use breath::{BreathAnimation, BreathCycle, BreathPhase, PhaseChange, CYCLE_SECS};
pub use clock::{manual_clock, IntervalClock, ManualClock, ManualTicker, TickSource};
pub use countdown::{Countdown, CountdownEvent};
pub use prompt::{
    default_prompts, pick_prompt, PromptEvent, PromptScheduler, DEFAULT_PROMPTS,
    PROMPT_INTERVAL_SECS, PROMPT_VISIBLE_SECS,
};
pub use task::{Interval, Timeout};
