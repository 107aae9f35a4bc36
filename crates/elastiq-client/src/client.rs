//! Shared client handle and request executor.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::decoder::{JsonDecoder, ResponseDecoder};
use crate::service::SearchTemplateService;
use crate::transport::{PerformRequestOptions, RawResponse, ReqwestConfig, ReqwestTransport, Transport};
use crate::{Error, Result, TRACING_TARGET_CLIENT};

/// Longest slice of an error body quoted in an error message.
const MAX_ERROR_BODY_CHARS: usize = 1024;

/// Inner client that holds the transport and decoder.
struct ClientInner {
    transport: Box<dyn Transport>,
    decoder: Box<dyn ResponseDecoder>,
}

/// Shared handle to a search engine.
///
/// The client is the only state shared between requests. Service builders
/// borrow it for the duration of a call and never mutate it, so one client
/// can back any number of concurrent requests. Cloning is cheap.
///
/// # Examples
///
/// ```rust,ignore
/// use elastiq_client::{Client, ReqwestConfig};
///
/// let client = Client::from_config(ReqwestConfig::new("http://127.0.0.1:9200"))?;
/// let result = client
///     .search_template()
///     .with_index("books")
///     .with_id("by-author")
///     .with_param("author", "tolkien")
///     .send()
///     .await?;
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client over `transport` with the default JSON decoder.
    pub fn new<T>(transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Self::with_decoder(transport, JsonDecoder)
    }

    /// Creates a new client with a custom response decoder.
    pub fn with_decoder<T, D>(transport: T, decoder: D) -> Self
    where
        T: Transport + 'static,
        D: ResponseDecoder + 'static,
    {
        let inner = ClientInner {
            transport: Box::new(transport),
            decoder: Box::new(decoder),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Creates a new client backed by a [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: ReqwestConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            url = %transport.config().url,
            "Client created successfully"
        );

        Ok(Self::new(transport))
    }

    /// Starts building a templated search request.
    pub fn search_template(&self) -> SearchTemplateService<'_> {
        SearchTemplateService::new(self)
    }

    /// Sends a single request and checks its status.
    ///
    /// The call fails with [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled)
    /// as soon as `cancel` fires, without waiting for the transport. Non-2xx
    /// responses become errors whose kind follows the status and whose message
    /// carries the engine's error reason. No retries are attempted.
    pub async fn perform_request(
        &self,
        cancel: &CancellationToken,
        options: PerformRequestOptions,
    ) -> Result<RawResponse> {
        let started_at = Instant::now();
        let method = options.method.clone();
        let path = options.path.clone();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            %method,
            path = %path,
            params = options.params.len(),
            has_body = options.body.is_some(),
            "Performing request"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::cancelled()
                .with_message(format!("{method} {path} cancelled before a response arrived"))),
            result = self.inner.transport.perform_request(options) => result,
        };

        let elapsed = started_at.elapsed();
        let response = match result {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CLIENT,
                    %method,
                    path = %path,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Request failed"
                );
                return Err(error);
            }
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            %method,
            path = %path,
            status = response.status.as_u16(),
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        check_response(response)
    }

    /// Decodes a response body into `T` using the client's decoder.
    pub fn decode<T>(&self, body: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let document = self.inner.decoder.decode(body)?;
        serde_json::from_value(document).map_err(|error| {
            Error::decode()
                .with_message(format!("unexpected response shape: {error}"))
                .with_source(error)
        })
    }
}

/// Turns a non-2xx response into an error.
fn check_response(response: RawResponse) -> Result<RawResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let message = error_reason(&response.body).unwrap_or_else(|| {
        let body = String::from_utf8_lossy(&response.body);
        if body.trim().is_empty() {
            format!("HTTP {}", response.status)
        } else {
            body.chars().take(MAX_ERROR_BODY_CHARS).collect()
        }
    });

    Err(Error::from_status(response.status)
        .with_message(message)
        .with_headers(response.headers))
}

/// Extracts the reason from an engine error body.
///
/// The engine reports `{"error": {"type": "...", "reason": "..."}, "status": N}`;
/// older versions send `{"error": "..."}`.
fn error_reason(body: &[u8]) -> Option<String> {
    let document: Value = serde_json::from_slice(body).ok()?;
    match document.get("error")? {
        Value::String(reason) => Some(reason.clone()),
        Value::Object(details) => {
            let kind = details.get("type").and_then(Value::as_str);
            let reason = details.get("reason").and_then(Value::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => Some(format!("{kind}: {reason}")),
                (Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
                (None, None) => None,
            }
        }
        _ => None,
    }
}
