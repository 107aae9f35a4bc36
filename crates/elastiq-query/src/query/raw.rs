//! Pass-through query built from caller-supplied JSON text.

use super::{Document, Query};
use crate::Result;

/// A query given as JSON text, e.g. one loaded from a file or a template.
///
/// The text is parsed on every call to [`Query::source`], so malformed input
/// surfaces as an error at render time rather than at construction.
#[derive(Debug, Clone)]
pub struct RawStringQuery {
    text: String,
}

impl RawStringQuery {
    /// Creates a new raw query from JSON text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Query for RawStringQuery {
    fn source(&self) -> Result<Document> {
        Ok(serde_json::from_str(&self.text)?)
    }
}
