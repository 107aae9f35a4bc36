//! Transport abstraction.
//!
//! A [`Transport`] moves one request to the engine and hands back the raw
//! response. It does not interpret status codes or bodies; that is done by
//! [`Client`](crate::Client), so alternative transports (a test double, a
//! proxy-aware client) only need to move bytes.

mod config;
mod http;

use bytes::Bytes;
pub use config::ReqwestConfig;
pub use http::ReqwestTransport;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

use crate::{Params, Result};

/// A single outbound request.
#[derive(Debug, Clone)]
pub struct PerformRequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Resource path relative to the engine's base URL.
    pub path: String,
    /// Query-string parameters.
    pub params: Params,
    /// JSON request body.
    pub body: Option<Bytes>,
    /// Extra request headers.
    pub headers: HeaderMap,
}

impl PerformRequestOptions {
    /// Creates a new request without parameters, body or headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Sets the query-string parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the extra request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// The raw response to a [`PerformRequestOptions`].
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Creates a new response without headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Sets the response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Returns whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Core trait for sending requests to the engine.
///
/// Implementations must be shareable across tasks; a single transport backs
/// every request issued through a [`Client`](crate::Client).
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the raw response, whatever its status.
    async fn perform_request(&self, options: PerformRequestOptions) -> Result<RawResponse>;
}
