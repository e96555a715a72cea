//! HTTP client against a mock meditation backend.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use mockito::Matcher;
use serde_json::json;
use stillroom_core::api::{DurationUnit, LogRequest, MoodRequest};
use stillroom_core::history::streak_from_logs;
use stillroom_core::{ApiError, HistoryFilter, HttpMeditationApi, MeditationLogApi, Mood};

fn client(server: &mockito::Server) -> HttpMeditationApi {
    HttpMeditationApi::new(&format!("{}/api", server.url()), Duration::from_secs(5)).unwrap()
}

fn request() -> LogRequest {
    LogRequest {
        user_id: "u1".into(),
        duration: 300.0,
        theme: "rain".into(),
        timestamp: Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn log_session_returns_server_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/meditation/log")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "userId": "u1",
            "duration": 300.0,
            "theme": "rain",
        })))
        .with_status(201)
        .with_body(r#"{"_id":"abc123"}"#)
        .create_async()
        .await;

    let id = client(&server).log_session(&request()).await.unwrap();
    assert_eq!(id, "abc123");
    mock.assert_async().await;
}

#[tokio::test]
async fn log_session_without_id_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/meditation/log")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let err = client(&server).log_session(&request()).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingField { ref field, .. } if field == "_id"));
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/meditation/log/mood")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = client(&server)
        .log_mood(&MoodRequest {
            log_id: "abc123".into(),
            mood: Mood::Focused,
        })
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let api = HttpMeditationApi::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
    let err = api.log_session(&request()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}

#[tokio::test]
async fn fetch_logs_feeds_filter_calendar_and_streak() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/meditation/logs/u1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "_id": "a", "userId": "u1", "duration": 300, "theme": "rain",
                  "timestamp": "2026-10-14T07:00:00Z", "mood": "Calm" },
                { "_id": "b", "userId": "u1", "duration": 600, "theme": "ocean",
                  "timestamp": "2026-10-15T07:00:00Z" },
                { "_id": "c", "userId": "u1", "duration": 300, "theme": "rain",
                  "timestamp": "2026-10-16T07:00:00Z", "mood": "focused" }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let logs = client(&server).fetch_logs("u1").await.unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[1].mood, None);

    let rain = HistoryFilter {
        theme: Some("rain".into()),
        ..Default::default()
    }
    .apply(logs.clone(), DurationUnit::Seconds);
    let ids: Vec<&str> = rain.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);

    let today = "2026-10-16".parse().unwrap();
    assert_eq!(streak_from_logs(&logs, &Utc, today).count, 3);

    let calendar = HistoryFilter {
        duration_secs: Some(300),
        ..Default::default()
    }
    .calendar(&logs, DurationUnit::Seconds, &Utc, 2026, 10);
    assert_eq!(calendar.total, 2);
    assert_eq!(calendar.days.len(), 2);
}

#[tokio::test]
async fn fetch_streak_parses_remote_shape() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/meditation/streak/u1")
        .with_status(200)
        .with_body(r#"{"count":4,"lastDate":"2026-10-16T07:00:00Z"}"#)
        .create_async()
        .await;

    let streak = client(&server).fetch_streak("u1").await.unwrap();
    assert_eq!(streak.count, 4);
    assert_eq!(
        streak.last_date,
        Some(Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn unknown_user_is_a_status_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/meditation/logs/ghost")
        .with_status(404)
        .with_body(r#"{"message":"not found"}"#)
        .create_async()
        .await;

    let err = client(&server).fetch_logs("ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}
