use clap::Subcommand;
use serde::Serialize;
use stillroom_core::session::{parse_duration, SilentPlayer, PRESET_MINUTES};
use stillroom_core::{
    AmbienceTrack, Config, Event, IntervalClock, MeditationSession, Mood, SessionCommand,
    SessionOutcome, SessionRunner,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::{api_client, runtime};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a session; events are printed as JSON lines.
    ///
    /// Keys (followed by Enter): p = pause/resume, m = mute, s = status, q = exit.
    /// After completion, type a mood (calm, focused, relaxed, energized, balanced).
    Start {
        /// Session length: 5 (minutes), 5m, 90s or 1:30
        #[arg(long)]
        duration: Option<String>,
        /// Ambience track id (see `session presets`)
        #[arg(long)]
        ambience: Option<String>,
        /// Start with ambience muted
        #[arg(long)]
        muted: bool,
        /// Seed for prompt selection
        #[arg(long)]
        seed: Option<u64>,
        /// Record this mood automatically on completion
        #[arg(long)]
        mood: Option<Mood>,
        /// Do not log the session to the backend
        #[arg(long)]
        offline: bool,
    },
    /// List duration presets and ambience tracks
    Presets,
}

#[derive(Serialize)]
struct Presets {
    durations_minutes: Vec<u64>,
    ambience: Vec<AmbienceTrack>,
    moods: Vec<Mood>,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Start {
            duration,
            ambience,
            muted,
            seed,
            mood,
            offline,
        } => {
            let config = Config::load()?;
            let duration_secs = duration.as_deref().map(parse_duration).transpose()?;
            let mut session_config = config.session_config(duration_secs, ambience.as_deref())?;
            if muted {
                session_config = session_config.muted(true);
            }
            if let Some(seed) = seed {
                session_config = session_config.with_seed(seed);
            }
            let user_id = if offline { None } else { config.api.user_id.clone() };

            let rt = runtime()?;
            let outcome = rt.block_on(async {
                let (session, opening) = MeditationSession::start(session_config, SilentPlayer::new())?;
                let (event_tx, event_rx) = mpsc::unbounded_channel();
                let (command_tx, command_rx) = mpsc::channel(16);

                let mut runner = SessionRunner::new(session, api_client(&config)?, event_tx.clone())
                    .with_duration_unit(config.api.duration_unit);
                if let Some(user_id) = user_id {
                    runner = runner.with_user(user_id);
                }
                if let Some(mood) = mood {
                    runner = runner.with_auto_mood(mood);
                }

                for event in opening {
                    let _ = event_tx.send(event);
                }
                drop(event_tx);

                let printer = tokio::spawn(print_events(event_rx));
                tokio::spawn(read_commands(command_tx));

                let outcome = runner.run(IntervalClock::per_second(), command_rx).await;
                // The runner owned the last sender; the printer drains and stops.
                let _ = printer.await;
                Ok::<_, Box<dyn std::error::Error>>(outcome)
            });
            // The stdin reader blocks on a thread the runtime cannot interrupt.
            rt.shutdown_background();

            report(&outcome?);
        }
        SessionAction::Presets => {
            let presets = Presets {
                durations_minutes: PRESET_MINUTES.to_vec(),
                ambience: AmbienceTrack::catalog(),
                moods: Mood::ALL.to_vec(),
            };
            println!("{}", serde_json::to_string_pretty(&presets)?);
        }
    }
    Ok(())
}

async fn print_events(mut events: mpsc::UnboundedReceiver<Event>) {
    while let Some(event) = events.recv().await {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(e) => debug!(error = %e, "event not serializable"),
        }
        if let Event::SessionCompleted { mood_choices, .. } = &event {
            let names: Vec<String> = mood_choices.iter().map(|m| m.to_string().to_lowercase()).collect();
            eprintln!("How do you feel? ({})", names.join(", "));
        }
    }
}

/// Translate stdin lines into session commands until input ends.
async fn read_commands(commands: mpsc::Sender<SessionCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut confirming_exit = false;

    while let Ok(Some(line)) = lines.next_line().await {
        let input = line.trim().to_lowercase();
        let command = if confirming_exit {
            confirming_exit = false;
            SessionCommand::Exit {
                confirmed: matches!(input.as_str(), "y" | "yes"),
            }
        } else {
            match input.as_str() {
                "" => continue,
                "p" => SessionCommand::TogglePause,
                "m" => SessionCommand::ToggleMute,
                "s" => SessionCommand::Snapshot,
                "q" => {
                    confirming_exit = true;
                    eprintln!("End this session? [y/N]");
                    continue;
                }
                other => match other.parse::<Mood>() {
                    Ok(mood) => SessionCommand::SelectMood(mood),
                    Err(e) => {
                        eprintln!("{e} (keys: p, m, s, q)");
                        continue;
                    }
                },
            }
        };
        if commands.send(command).await.is_err() {
            break;
        }
    }
}

fn report(outcome: &SessionOutcome) {
    match outcome {
        SessionOutcome::MoodCaptured(summary) => eprintln!("{summary}"),
        SessionOutcome::Completed(record) => eprintln!(
            "Session complete: {} with {}.",
            stillroom_core::session::format_duration(record.duration_secs),
            record.ambience_name
        ),
        SessionOutcome::Exited { remaining_secs } => eprintln!(
            "Session ended early with {} left.",
            stillroom_core::session::format_clock(*remaining_secs)
        ),
        SessionOutcome::Abandoned { remaining_secs } => debug!(remaining_secs, "session abandoned"),
    }
}
