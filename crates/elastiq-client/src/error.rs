//! Structured error handling for client operations.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while building or executing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Request configuration is malformed.
    InvalidInput,
    /// A query or parameter could not be serialized.
    Encoding,
    /// A path template could not be expanded.
    PathResolution,
    /// Connection-level failure.
    NetworkError,
    /// The request timed out.
    Timeout,
    /// The request was cancelled before a response arrived.
    Cancelled,
    /// The engine rejected the credentials.
    Authentication,
    /// The engine denied access to the resource.
    Authorization,
    /// The resource does not exist.
    NotFound,
    /// Rate limit exceeded.
    RateLimited,
    /// The engine is temporarily unavailable.
    ServiceUnavailable,
    /// Any other non-success response from the engine.
    ExternalError,
    /// The response body does not match the expected shape.
    Decode,
    /// Client configuration error.
    Configuration,
}

impl ErrorKind {
    /// Maps a non-success HTTP status to an error kind.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::InvalidInput,
            401 => Self::Authentication,
            403 => Self::Authorization,
            404 => Self::NotFound,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            502..=504 => Self::ServiceUnavailable,
            _ => Self::ExternalError,
        }
    }

    /// Check if this error kind is typically retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::Timeout | Self::ServiceUnavailable | Self::RateLimited
        )
    }
}

/// Structured error type with classification and response metadata.
///
/// Errors raised after a response was received carry its status and
/// headers, so callers can inspect e.g. rate-limit headers even when the
/// body could not be decoded.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
    /// HTTP status of the response, if one was received.
    pub status: Option<StatusCode>,
    /// Headers of the response, if one was received.
    pub headers: Option<HeaderMap>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
            status: None,
            headers: None,
        }
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new encoding error.
    pub fn encoding() -> Self {
        Self::new(ErrorKind::Encoding)
    }

    /// Creates a new path resolution error.
    pub fn path_resolution() -> Self {
        Self::new(ErrorKind::PathResolution)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Creates a new decode error.
    pub fn decode() -> Self {
        Self::new(ErrorKind::Decode)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates an error for a non-success response status.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(ErrorKind::from_status(status)).with_status(status)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches the response status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the response headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the response status, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the response headers, if a response was received.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    /// Check if this error is retryable based on its kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<elastiq_query::Error> for Error {
    fn from(error: elastiq_query::Error) -> Self {
        Self::encoding()
            .with_message(error.to_string())
            .with_source(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout()
                .with_message(error.to_string())
                .with_source(error)
        } else if error.is_connect() {
            Self::network_error()
                .with_message("Connection failed")
                .with_source(error)
        } else if error.is_builder() {
            Self::configuration()
                .with_message(error.to_string())
                .with_source(error)
        } else {
            Self::network_error()
                .with_message(error.to_string())
                .with_source(error)
        }
    }
}
