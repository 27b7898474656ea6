//! HTTP GET shim for IIIF documents, plus the URL check the input bar runs
//! before a fetch is issued.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::FetchConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Please enter a URL")]
    Empty,
    #[error("Invalid URL format")]
    Invalid,
    #[error("URL must include http:// or https://")]
    MissingScheme,
}

/// Validate user input as an absolute http(s) URL.
pub fn parse_resource_url(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Empty);
    }
    if input.chars().any(char::is_whitespace) {
        return Err(UrlError::Invalid);
    }
    match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            if url.host_str().map_or(true, str::is_empty) {
                return Err(UrlError::Invalid);
            }
            Ok(url)
        }
        // `localhost:8080/x` parses with scheme "localhost"
        Ok(_) => Err(UrlError::MissingScheme),
        Err(url::ParseError::RelativeUrlWithoutBase) => Err(UrlError::MissingScheme),
        Err(_) => Err(UrlError::Invalid),
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch data: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to fetch data: request timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to fetch data: {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Thin wrapper around a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// GET `url` and return the body. Anything other than 2xx is an error.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/ld+json, application/json;q=0.9, */*;q=0.1")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Body(e)
            }
        })?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(body.to_vec())
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(e)
        }
    }
}
