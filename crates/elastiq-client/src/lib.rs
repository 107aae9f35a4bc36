#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod decoder;
mod error;
mod params;
mod path;

pub mod service;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use client::Client;
pub use decoder::{JsonDecoder, ResponseDecoder};
pub use elastiq_query as query;
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use params::Params;
pub use path::PathTemplate;
pub use service::{SearchResult, SearchTemplateBody, SearchTemplateService};
pub use transport::{
    PerformRequestOptions, RawResponse, ReqwestConfig, ReqwestTransport, Transport,
};

/// Tracing target for request execution.
pub const TRACING_TARGET_CLIENT: &str = "elastiq_client::client";

/// Tracing target for service builders.
pub const TRACING_TARGET_SERVICE: &str = "elastiq_client::service";

/// Tracing target for the HTTP transport.
pub const TRACING_TARGET_TRANSPORT: &str = "elastiq_client::transport";
