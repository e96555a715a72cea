use chrono::{Datelike, Local};
use clap::Subcommand;
use stillroom_core::api::MeditationLogApi;
use stillroom_core::history::{parse_month, streak_from_logs};
use stillroom_core::session::parse_duration;
use stillroom_core::{ApiError, Config, HistoryFilter};

use super::{api_client, runtime};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List logged sessions, newest first
    List {
        /// Only sessions with this ambience (e.g. "rain")
        #[arg(long)]
        theme: Option<String>,
        /// Only sessions followed by this mood
        #[arg(long)]
        mood: Option<String>,
        /// Only sessions of this length (5, 5m, 90s, 1:30)
        #[arg(long)]
        duration: Option<String>,
        /// Maximum number of sessions to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Sessions per day for one month, in local time
    Calendar {
        /// Month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Only sessions with this ambience (e.g. "rain")
        #[arg(long)]
        theme: Option<String>,
        /// Only sessions followed by this mood
        #[arg(long)]
        mood: Option<String>,
        /// Only sessions of this length (5, 5m, 90s, 1:30)
        #[arg(long)]
        duration: Option<String>,
    },
    /// Consecutive days with at least one session
    Streak {
        /// Ask the backend instead of computing from the logs
        #[arg(long)]
        remote: bool,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let user_id = config.api.user_id.clone().ok_or(ApiError::NoUser)?;
    let api = api_client(&config)?;
    let rt = runtime()?;

    match action {
        HistoryAction::List {
            theme,
            mood,
            duration,
            limit,
        } => {
            let filter = HistoryFilter {
                theme,
                mood,
                duration_secs: duration.as_deref().map(parse_duration).transpose()?,
                limit,
            };
            let logs = rt.block_on(api.fetch_logs(&user_id))?;
            let logs = filter.apply(logs, config.api.duration_unit);
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
        HistoryAction::Calendar {
            month,
            theme,
            mood,
            duration,
        } => {
            let (year, month) = match month {
                Some(month) => parse_month(&month)?,
                None => {
                    let today = Local::now().date_naive();
                    (today.year(), today.month())
                }
            };
            let filter = HistoryFilter {
                theme,
                mood,
                duration_secs: duration.as_deref().map(parse_duration).transpose()?,
                limit: None,
            };
            let logs = rt.block_on(api.fetch_logs(&user_id))?;
            let calendar = filter.calendar(&logs, config.api.duration_unit, &Local, year, month);
            println!("{}", serde_json::to_string_pretty(&calendar)?);
        }
        HistoryAction::Streak { remote } => {
            if remote {
                let streak = rt.block_on(api.fetch_streak(&user_id))?;
                println!("{}", serde_json::to_string_pretty(&streak)?);
            } else {
                let logs = rt.block_on(api.fetch_logs(&user_id))?;
                let streak = streak_from_logs(&logs, &Local, Local::now().date_naive());
                println!("{}", serde_json::to_string_pretty(&streak)?);
            }
        }
    }
    Ok(())
}
