//! Reqwest-based HTTP transport.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use url::Url;

use super::{PerformRequestOptions, RawResponse, ReqwestConfig, Transport};
use crate::{Error, Result, TRACING_TARGET_TRANSPORT};

/// Inner transport that holds the HTTP client and configuration.
struct ReqwestTransportInner {
    http: reqwest::Client,
    base_url: Url,
    config: ReqwestConfig,
}

/// Reqwest-based transport that sends requests to a single engine endpoint.
///
/// # Examples
///
/// ```rust,ignore
/// use elastiq_client::{Client, ReqwestConfig, ReqwestTransport};
///
/// let config = ReqwestConfig::new("http://127.0.0.1:9200").with_timeout(10);
/// let transport = ReqwestTransport::new(config)?;
/// let client = Client::new(transport);
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Arc<ReqwestTransportInner>,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a new transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        config.validate()?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();
        let base_url = config.base_url()?;

        tracing::debug!(
            target: TRACING_TARGET_TRANSPORT,
            url = %base_url,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest transport"
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()?;

        let inner = ReqwestTransportInner {
            http,
            base_url,
            config,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the transport configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Resolves a request path against the base URL.
    fn url(&self, path: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| {
                Error::path_resolution()
                    .with_message(format!("cannot resolve path `{path}`"))
                    .with_source(error)
            })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn perform_request(&self, options: PerformRequestOptions) -> Result<RawResponse> {
        let url = self.url(&options.path)?;

        let mut request = self
            .inner
            .http
            .request(options.method, url)
            .query(&options.params);

        if let Some(body) = options.body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        // Caller headers go last so they can override the content type
        let response = request.headers(options.headers).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(ReqwestConfig::default()).unwrap();
        assert_eq!(transport.config().url, crate::transport::config::DEFAULT_URL);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(ReqwestTransport::new(ReqwestConfig::new("mailto:ops@example.com")).is_err());
    }

    #[test]
    fn test_url_resolution() {
        let transport = ReqwestTransport::new(ReqwestConfig::new("http://es.local:9200")).unwrap();

        let url = transport.url("my-index/_search/template").unwrap();
        assert_eq!(url.as_str(), "http://es.local:9200/my-index/_search/template");

        let url = transport.url("/_search/template").unwrap();
        assert_eq!(url.as_str(), "http://es.local:9200/_search/template");

        let url = transport.url("logs%2F2024/_search/template").unwrap();
        assert_eq!(url.path(), "/logs%2F2024/_search/template");
    }
}
