//! Client seam for the meditation backend.
//!
//! The backend is an external collaborator; only its contract lives here.
//! Completion and mood writes are best-effort: callers log failures and move
//! on.

mod http;
mod types;

use std::future::Future;

pub use http::HttpMeditationApi;
pub use types::{DurationUnit, LogRecord, LogRequest, MoodRequest, RemoteStreak};

use crate::error::ApiError;

pub trait MeditationLogApi {
    /// `POST /meditation/log`. Returns the id of the stored log.
    fn log_session(&self, request: &LogRequest) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST /meditation/log/mood`.
    fn log_mood(&self, request: &MoodRequest) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET /meditation/logs/{userId}`.
    fn fetch_logs(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<LogRecord>, ApiError>> + Send;

    /// `GET /meditation/streak/{userId}`.
    fn fetch_streak(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<RemoteStreak, ApiError>> + Send;
}
