//! Error handling for the Furns client

use std::fmt;
use thiserror::Error;

use crate::editor::FieldErrors;

/// Unified error type for the Furns client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or transport failures (nothing came back from the server)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `detail` is the server-provided message when the body carried one.
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("request failed"))]
    Api { status: u16, detail: Option<String> },

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Local file errors while preparing an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required fields missing on a draft; raised before any request is made
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error
    pub fn api(status: u16, detail: Option<String>) -> Self {
        Error::Api { status, detail }
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The server-provided `detail`, if the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an API failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message to show the operator: the server's `detail` or the given fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
