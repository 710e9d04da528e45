//! One-shot HTTP fetchers for the quiz and weather features.
//!
//! # Responsibility
//! - Define the `HttpTransport` seam so fetchers can run against canned
//!   responses in tests.
//! - Map transport, status and decode failures into `FetchError`.
//!
//! # Invariants
//! - One request per call: no retry, no backoff, no caching.
//! - Request URLs are never logged in full (the weather URL carries the API
//!   key); only host and path are.

pub mod html;
pub mod liveness;
pub mod trivia;
pub mod weather;

use log::{debug, warn};
use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::{Duration, Instant};

pub type FetchResult<T> = Result<T, FetchError>;

/// Network-side failure of a one-shot fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Input rejected before any request was made.
    InvalidInput(&'static str),
    /// Weather lookups need an API key from configuration.
    MissingApiKey,
    InvalidUrl(String),
    /// Connectivity, TLS or timeout failure.
    Transport(String),
    /// Non-2xx response, with the service's message when it sent one.
    Status { code: u16, message: Option<String> },
    /// Response body did not match the expected shape.
    Decode(String),
    /// Service answered 2xx but reported an error code in the body.
    Service { code: i64 },
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            Self::MissingApiKey => write!(f, "no API key configured"),
            Self::InvalidUrl(message) => write!(f, "invalid request url: {message}"),
            Self::Transport(message) => write!(f, "network error: {message}"),
            Self::Status {
                code,
                message: Some(message),
            } => write!(f, "HTTP {code}: {message}"),
            Self::Status { code, message: None } => write!(f, "HTTP {code}"),
            Self::Decode(message) => write!(f, "unexpected response: {message}"),
            Self::Service { code } => write!(f, "service reported error code {code}"),
        }
    }
}

impl Error for FetchError {}

/// Raw HTTP response as seen by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal GET transport.
pub trait HttpTransport {
    fn get(&self, url: Url) -> impl Future<Output = FetchResult<HttpResponse>> + Send;
}

impl<T: HttpTransport + Sync + ?Sized> HttpTransport for &T {
    fn get(&self, url: Url) -> impl Future<Output = FetchResult<HttpResponse>> + Send {
        (**self).get(url)
    }
}

/// `reqwest`-backed transport with a request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: Url) -> FetchResult<HttpResponse> {
        let started_at = Instant::now();
        let host = url.host_str().unwrap_or_default().to_string();
        let path = url.path().to_string();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                let err = err.without_url();
                warn!(
                    "event=http_get module=fetch status=error host={} path={} duration_ms={} error={}",
                    host,
                    path,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(FetchError::Transport(err.to_string()));
            }
        };

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.without_url().to_string()))?;
        debug!(
            "event=http_get module=fetch status=ok host={} path={} http_status={} bytes={} duration_ms={}",
            host,
            path,
            status,
            body.len(),
            started_at.elapsed().as_millis()
        );
        Ok(HttpResponse { status, body })
    }
}

/// Joins `base_url` (with or without trailing slash) and an absolute `path`.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> FetchResult<Url> {
    Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), path))
        .map_err(|err| FetchError::InvalidUrl(err.to_string()))
}
