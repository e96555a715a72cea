//! reqwest-backed implementation of [`MeditationLogApi`].

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::types::{LogRecord, LogRequest, MoodRequest, RemoteStreak};
use super::MeditationLogApi;
use crate::error::ApiError;

pub struct HttpMeditationApi {
    base_url: Url,
    http_client: Client,
}

impl HttpMeditationApi {
    /// Create a client for `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, ApiError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path.to_string(),
                source,
            })?;
        check_status(path, resp).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path.to_string(),
                source,
            })?;
        check_status(path, resp)
            .await?
            .json()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: path.to_string(),
                source,
            })
    }
}

async fn check_status(endpoint: &str, resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

impl MeditationLogApi for HttpMeditationApi {
    async fn log_session(&self, request: &LogRequest) -> Result<String, ApiError> {
        const PATH: &str = "meditation/log";
        let resp: serde_json::Value = self
            .post_json(PATH, request)
            .await?
            .json()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: PATH.to_string(),
                source,
            })?;

        resp.get("_id")
            .and_then(|id| id.as_str())
            .map(str::to_owned)
            .ok_or_else(|| ApiError::MissingField {
                endpoint: PATH.to_string(),
                field: "_id".to_string(),
            })
    }

    async fn log_mood(&self, request: &MoodRequest) -> Result<(), ApiError> {
        self.post_json("meditation/log/mood", request).await?;
        Ok(())
    }

    async fn fetch_logs(&self, user_id: &str) -> Result<Vec<LogRecord>, ApiError> {
        self.get_json(&format!("meditation/logs/{user_id}")).await
    }

    async fn fetch_streak(&self, user_id: &str) -> Result<RemoteStreak, ApiError> {
        self.get_json(&format!("meditation/streak/{user_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = HttpMeditationApi::new("http://localhost:5000/api", Duration::from_secs(5)).unwrap();
        assert_eq!(
            api.endpoint("meditation/log").unwrap().as_str(),
            "http://localhost:5000/api/meditation/log"
        );
        assert_eq!(
            api.endpoint("/meditation/logs/u1").unwrap().as_str(),
            "http://localhost:5000/api/meditation/logs/u1"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            HttpMeditationApi::new("not a url", Duration::from_secs(5)),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
