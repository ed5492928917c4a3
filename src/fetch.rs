//! HTTP client facade for talking to the catalog backend
//!
//! Every request goes through [`HttpClient`], which pins the base URL and the
//! bearer credential, and through [`FetchBuilder::execute`], which turns any
//! failure into a single [`Error`] value and logs it.

use std::time::Duration;

use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ClientOptions;
use crate::error::{Error, Result};

/// Error body the backend sends on failure. `detail` is usually a string,
/// but validation failures carry a structured value.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Extract the `detail` message from a failed response body.
fn parse_detail(body: &[u8]) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_slice(body).ok()?;
    match payload.detail? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

enum Body {
    Json(Vec<u8>),
    Multipart(Form),
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Body>,
    timeout: Option<Duration>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Add bearer token authentication to the request
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Set a per-request timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(Body::Json(json));
        Ok(self)
    }

    /// Send a multipart form instead of JSON. The JSON content type is
    /// dropped so the transport can set the boundary itself.
    pub fn multipart(mut self, form: Form) -> Self {
        self.headers.remove(CONTENT_TYPE);
        self.body = Some(Body::Multipart(form));
        self
    }

    /// Build the request
    fn build(self) -> Result<(RequestBuilder, String)> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let label = format!("{} {}", self.method, url.path());
        let mut req = self.client.request(self.method, url.as_str());
        req = req.headers(self.headers);

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        req = match self.body {
            Some(Body::Json(bytes)) => req.body(bytes),
            Some(Body::Multipart(form)) => req.multipart(form),
            None => req,
        };

        Ok((req, label))
    }

    /// Execute the request and parse the response body as JSON.
    ///
    /// An empty success body is read as JSON `null`.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let (req, label) = self.build()?;

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("{} failed: {}", label, e);
                return Err(Error::Http(e));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("{} failed reading body: {}", label, e);
                return Err(Error::Http(e));
            }
        };

        if !status.is_success() {
            let err = Error::api(status.as_u16(), parse_detail(&bytes));
            error!("{} failed: {}", label, err);
            return Err(err);
        }

        debug!("{} -> {}", label, status);
        let parsed = if bytes.is_empty() || status == StatusCode::NO_CONTENT {
            serde_json::from_slice(b"null")
        } else {
            serde_json::from_slice(&bytes)
        };
        parsed.map_err(|e| {
            error!("{} returned an unreadable body: {}", label, e);
            Error::Json(e)
        })
    }
}

/// Transport bound to one backend: base URL, credential and timeout.
#[derive(Debug, Clone)]
pub struct HttpClient {
    api_base: String,
    token: String,
    timeout: Option<Duration>,
    client: Client,
}

impl HttpClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Self::with_client(options, Client::new())
    }

    /// Build on top of an existing reqwest client
    pub fn with_client(options: &ClientOptions, client: Client) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            api_base: options.api_base(),
            token: options.api_secret.clone(),
            timeout: options.request_timeout,
            client,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Absolute URL for a resource path such as `/products/42`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// Start an authenticated request against `path`
    pub fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.client, &self.endpoint(path), method)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
    }

    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::DELETE, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_extracted() {
        assert_eq!(
            parse_detail(br#"{"detail":"Product not found"}"#),
            Some("Product not found".to_string())
        );
    }

    #[test]
    fn structured_detail_is_stringified() {
        let detail = parse_detail(br#"{"detail":[{"loc":["body","name"]}]}"#);
        assert_eq!(detail, Some(r#"[{"loc":["body","name"]}]"#.to_string()));
    }

    #[test]
    fn unstructured_body_has_no_detail() {
        assert_eq!(parse_detail(b"Internal Server Error"), None);
        assert_eq!(parse_detail(br#"{"message":"nope"}"#), None);
    }

    #[test]
    fn endpoint_keeps_api_prefix() {
        let http = HttpClient::new(&ClientOptions::default()).unwrap();
        assert_eq!(http.endpoint("/products/7"), "http://localhost:8001/api/products/7");
        assert_eq!(http.endpoint("categories"), "http://localhost:8001/api/categories");
    }
}
