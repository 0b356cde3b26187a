// HTTP client for the upstream REST APIs.
// Handles request headers, timeouts, and status-to-error conversion.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;

use crate::error::{FetchError, PokedexError, Result};

/// Performs a GET against a fully built URL and returns the parsed body.
///
/// This is the seam the fetch cache calls through. `ApiClient` talks to the
/// network; tests substitute deterministic implementations.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Value, FetchError>;
}

/// reqwest-backed fetcher shared by every view.
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client that aborts requests after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("pokedex-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PokedexError::Config(e.to_string()))?;

        Ok(Self { client })
    }

    /// Make a GET request.
    async fn get(&self, url: &str) -> std::result::Result<Response, FetchError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        Self::check_response(response)
    }

    /// Check response status and convert errors.
    fn check_response(response: Response) -> std::result::Result<Response, FetchError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(response.url().to_string())),
            status => Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            }),
        }
    }
}

#[async_trait]
impl Fetcher for ApiClient {
    async fn fetch(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let response = self.get(url).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}
