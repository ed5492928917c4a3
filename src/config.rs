//! Configuration options for the Furns client

use std::time::Duration;

use crate::error::{Error, Result};

/// Backend used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// Static admin credential used when nothing else is configured.
pub const DEFAULT_API_SECRET: &str = "furns-admin-secret-2024";

/// Configuration options for the Furns client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Origin of the backend, e.g. `http://localhost:8001`. Uploaded assets are served from here.
    pub backend_url: String,

    /// Static bearer token attached to every request
    pub api_secret: String,

    /// Path prefix under which the REST resources live
    pub api_prefix: String,

    /// The request timeout. Unset means the transport default.
    pub request_timeout: Option<Duration>,

    /// Upper bound on simultaneous uploads when several files are attached at once
    pub upload_concurrency: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            api_secret: DEFAULT_API_SECRET.to_string(),
            api_prefix: "/api".to_string(),
            request_timeout: None,
            upload_concurrency: 4,
        }
    }
}

impl ClientOptions {
    /// Load options from the environment, reading a `.env` file first if present.
    ///
    /// Recognised variables: `FURNS_BACKEND_URL`, `FURNS_API_SECRET`,
    /// `FURNS_REQUEST_TIMEOUT_SECS`. Missing variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut options = Self::default();
        if let Ok(url) = std::env::var("FURNS_BACKEND_URL") {
            options = options.with_backend_url(&url);
        }
        if let Ok(secret) = std::env::var("FURNS_API_SECRET") {
            options = options.with_api_secret(&secret);
        }
        if let Ok(secs) = std::env::var("FURNS_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::config(format!("FURNS_REQUEST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            options = options.with_request_timeout(Some(Duration::from_secs(secs)));
        }

        options.validate()?;
        Ok(options)
    }

    /// Check the options are usable before a client is built from them.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend_url)?;
        if self.api_secret.is_empty() {
            return Err(Error::config("api_secret cannot be empty"));
        }
        if self.upload_concurrency == 0 {
            return Err(Error::config("upload_concurrency must be at least 1"));
        }
        Ok(())
    }

    /// Base URL of the REST resources, e.g. `http://localhost:8001/api`.
    pub fn api_base(&self) -> String {
        format!(
            "{}/{}",
            self.backend_url.trim_end_matches('/'),
            self.api_prefix.trim_matches('/')
        )
        .trim_end_matches('/')
        .to_string()
    }

    /// Set the backend origin
    pub fn with_backend_url(mut self, value: &str) -> Self {
        self.backend_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token
    pub fn with_api_secret(mut self, value: &str) -> Self {
        self.api_secret = value.to_string();
        self
    }

    /// Set the API path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the upload fan-out bound
    pub fn with_upload_concurrency(mut self, value: usize) -> Self {
        self.upload_concurrency = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_joins_prefix() {
        let options = ClientOptions::default().with_backend_url("http://example.com/");
        assert_eq!(options.api_base(), "http://example.com/api");

        let bare = options.with_api_prefix("");
        assert_eq!(bare.api_base(), "http://example.com");
    }

    #[test]
    fn validate_rejects_empty_secret() {
        let options = ClientOptions::default().with_api_secret("");
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_url() {
        let options = ClientOptions::default().with_backend_url("not a url");
        assert!(matches!(options.validate(), Err(Error::Url(_))));
    }
}
