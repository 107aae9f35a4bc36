//! Query serialization error types.

use thiserror::Error;

/// Result type alias for query serialization.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while turning a query builder into its wire document.
#[derive(Debug, Error)]
pub enum Error {
    /// The builder state cannot be expressed as a query document.
    #[error("invalid {query} query: {reason}")]
    InvalidQuery {
        /// Name of the query kind, e.g. `knn`.
        query: &'static str,
        /// Why the query was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Creates an invalid query error.
    pub fn invalid_query(query: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            query,
            reason: reason.into(),
        }
    }
}
