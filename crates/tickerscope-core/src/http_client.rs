//! Transport seam between provider adapters and the network.
//!
//! Adapters build an [`HttpRequest`] and hand it to an [`HttpClient`]; tests
//! swap in a canned client so wire parsing can be checked without a socket.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

use crate::config::ProviderConfig;

pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// One GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub referer: Option<&'static str>,
    pub cookie: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            url: url.into(),
            referer: None,
            cookie: None,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn referer(mut self, referer: &'static str) -> Self {
        self.referer = Some(referer);
        self
    }

    /// Send an explicit `Cookie` header instead of relying on the jar.
    pub fn cookie(mut self, cookie: Option<&str>) -> Self {
        self.cookie = cookie.map(str::to_owned);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to build http client: {0}")]
    Setup(String),
}

impl HttpError {
    /// Whether the same request might succeed later.
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::Setup(_))
    }
}

pub trait HttpClient: Send + Sync {
    fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// reqwest transport with a cookie jar, so the session cookie set during the
/// crumb handshake is sent on later calls.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map(|client| Self { client })
            .map_err(|e| HttpError::Setup(e.to_string()))
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
        Box::pin(async move {
            let mut builder = self.client.get(&request.url).timeout(request.timeout);
            if let Some(referer) = request.referer {
                builder = builder.header(reqwest::header::REFERER, referer);
            }
            if let Some(cookie) = &request.cookie {
                builder = builder.header(reqwest::header::COOKIE, cookie);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else if e.is_connect() {
                    HttpError::Connect(e.to_string())
                } else {
                    HttpError::Request(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::Body(e.to_string()))?;
            Ok(HttpResponse { status, body })
        })
    }
}
