//! Response body decoding.

use elastiq_query::Document;

use crate::{Error, Result};

/// Turns a raw response body into a JSON document.
///
/// The client converts the document into the caller's target type, so a
/// decoder only decides how the bytes are parsed. Swap it to tune parsing,
/// e.g. to reject bodies that exceed a size limit.
pub trait ResponseDecoder: Send + Sync {
    /// Decodes a raw response body.
    fn decode(&self, body: &[u8]) -> Result<Document>;
}

/// Default decoder backed by `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode(&self, body: &[u8]) -> Result<Document> {
        serde_json::from_slice(body).map_err(|error| {
            Error::decode()
                .with_message(format!("response body is not valid JSON: {error}"))
                .with_source(error)
        })
    }
}
