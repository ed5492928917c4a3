//! Typed access to the backend's REST resources.
//!
//! ```no_run
//! use furns_admin::{AdminClient, ClientOptions};
//!
//! # async fn run() -> furns_admin::Result<()> {
//! let client = AdminClient::new(ClientOptions::default())?;
//! let categories = client.categories().list().await?;
//! # Ok(())
//! # }
//! ```

mod collection;
mod upload;

use serde::Deserialize;

use crate::config::ClientOptions;
use crate::error::Result;
use crate::fetch::HttpClient;
use crate::models::{Blog, Category, Image, Product};

pub use collection::{Collection, ProductQuery, Resource, Writable};
pub use upload::{UploadFile, Uploader};

/// Health probe body
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// The main entry point for talking to the catalog backend
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: HttpClient,
    options: ClientOptions,
}

impl AdminClient {
    /// Create a client for the configured backend
    pub fn new(options: ClientOptions) -> Result<Self> {
        let http = HttpClient::new(&options)?;
        Ok(Self { http, options })
    }

    /// Create a client from `FURNS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn products(&self) -> Collection<Product> {
        Collection::new(self.http.clone())
    }

    pub fn categories(&self) -> Collection<Category> {
        Collection::new(self.http.clone())
    }

    pub fn blogs(&self) -> Collection<Blog> {
        Collection::new(self.http.clone())
    }

    pub fn images(&self) -> Collection<Image> {
        Collection::new(self.http.clone())
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Health> {
        self.http.get("/health").execute().await
    }

    /// Absolute URL of an uploaded asset. Absolute URLs pass through.
    pub fn asset_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.options.backend_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_url_joins_backend_origin() {
        let client = AdminClient::new(ClientOptions::default()).unwrap();
        assert_eq!(
            client.asset_url("/uploads/a.png"),
            "http://localhost:8001/uploads/a.png"
        );
        assert_eq!(
            client.asset_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }
}
