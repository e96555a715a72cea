//! Prompt scheduler.
//!
//! Shows one randomly chosen guidance prompt every [`PROMPT_INTERVAL_SECS`]
//! and hides it after [`PROMPT_VISIBLE_SECS`]. At most one prompt is visible.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::task::{Interval, Timeout};
use crate::error::ValidationError;

pub const PROMPT_INTERVAL_SECS: u64 = 30;
pub const PROMPT_VISIBLE_SECS: u64 = 5;

pub const DEFAULT_PROMPTS: [&str; 8] = [
    "Close your eyes",
    "Let your thoughts drift away",
    "Feel the breath",
    "Relax your shoulders",
    "Notice the sensations in your body",
    "Be present in this moment",
    "Let go of any tension",
    "Find stillness within",
];

pub fn default_prompts() -> Vec<String> {
    DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect()
}

/// Pick a prompt uniformly at random. `None` only for an empty slice.
pub fn pick_prompt<'a, R: Rng + ?Sized>(rng: &mut R, prompts: &'a [String]) -> Option<&'a str> {
    if prompts.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..prompts.len());
    Some(prompts[index].as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptEvent {
    Shown { text: String },
    Hidden,
}

#[derive(Debug, Clone)]
pub struct PromptScheduler {
    prompts: Vec<String>,
    rng: Mcg128Xsl64,
    cycle: Interval,
    hide: Timeout,
    current: Option<String>,
}

impl PromptScheduler {
    /// Create a scheduler over a non-empty prompt set. With no seed the RNG is
    /// seeded from entropy.
    pub fn new(prompts: Vec<String>, seed: Option<u64>) -> Result<Self, ValidationError> {
        if prompts.is_empty() {
            return Err(ValidationError::EmptyCollection("prompts".into()));
        }
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Ok(Self {
            prompts,
            rng,
            cycle: Interval::new(PROMPT_INTERVAL_SECS),
            hide: Timeout::new(),
            current: None,
        })
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.cycle.is_running()
    }

    /// Start scheduling with an immediate prompt. No-op while running.
    pub fn start(&mut self, now: u64) -> Vec<PromptEvent> {
        if self.cycle.is_running() {
            return Vec::new();
        }
        self.cycle.start(now);
        self.show(now)
    }

    /// Cancel scheduling and hide any visible prompt.
    pub fn stop(&mut self) -> Option<PromptEvent> {
        self.cycle.cancel();
        self.hide.cancel();
        self.current.take().map(|_| PromptEvent::Hidden)
    }

    pub fn on_tick(&mut self, now: u64) -> Vec<PromptEvent> {
        let mut events = Vec::new();
        if self.hide.poll(now) && self.current.take().is_some() {
            events.push(PromptEvent::Hidden);
        }
        if self.cycle.poll(now) {
            events.extend(self.show(now));
        }
        events
    }

    fn show(&mut self, now: u64) -> Vec<PromptEvent> {
        let mut events = Vec::new();
        if self.current.take().is_some() {
            self.hide.cancel();
            events.push(PromptEvent::Hidden);
        }
        let Some(text) = pick_prompt(&mut self.rng, &self.prompts).map(str::to_owned) else {
            return events;
        };
        self.current = Some(text.clone());
        self.hide.schedule(now, PROMPT_VISIBLE_SECS);
        events.push(PromptEvent::Shown { text });
        events
    }
}
