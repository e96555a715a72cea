//! Core error types for stillroom-core.
//!
//! This module defines the error hierarchy using thiserror. Only
//! user-input errors stop a session from starting; backend and playback
//! failures are reported through these types but swallowed by the session
//! layer.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stillroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backend API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Ambience playback errors
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Validation errors raised before a session starts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Session length of zero
    #[error("Session duration must be at least one second")]
    ZeroDuration,

    /// Ambience id not present in the catalog
    #[error("Unknown ambience track: {0}")]
    UnknownAmbience(String),

    /// Mood label not recognised
    #[error("Unknown mood: {0}")]
    UnknownMood(String),

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Backend REST API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, body decode)
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body did not carry an expected field
    #[error("Malformed response from {endpoint}: missing '{field}'")]
    MissingField { endpoint: String, field: String },

    /// Base URL could not be joined with an endpoint path
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A user id is required for this call
    #[error("No user id configured (set api.user_id)")]
    NoUser,
}

/// Ambience playback errors. Never fatal to a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Failed to start ambience '{track}': {message}")]
    StartFailed { track: String, message: String },

    #[error("Audio output unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
