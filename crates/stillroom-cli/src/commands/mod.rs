pub mod config;
pub mod history;
pub mod session;

use stillroom_core::{Config, HttpMeditationApi};

/// Backend client built from the `[api]` config section.
pub(crate) fn api_client(config: &Config) -> Result<HttpMeditationApi, Box<dyn std::error::Error>> {
    Ok(HttpMeditationApi::new(
        &config.api.base_url,
        config.api.timeout(),
    )?)
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
