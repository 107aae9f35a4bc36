//! Search response types.

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, ErrorKind, Result};

/// Result of a search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    /// Headers of the HTTP response this result was decoded from.
    #[serde(skip)]
    pub header: HeaderMap,
    /// Search time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub took: Option<u64>,
    /// Whether the search timed out on any shard.
    pub timed_out: bool,
    /// Whether the search stopped early after `terminate_after` hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated_early: Option<bool>,
    /// Shard statistics.
    #[serde(rename = "_shards", skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    /// The matching documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<SearchHits>,
    /// Aggregation results, keyed by aggregation name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Map<String, Value>>,
    /// Scroll cursor, when scrolling.
    #[serde(rename = "_scroll_id", skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    /// Point-in-time id, when searching a point in time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pit_id: Option<String>,
}

impl SearchResult {
    /// Recovers the partial result attached to a decode failure.
    ///
    /// When a response arrives but its body cannot be decoded, the error still
    /// carries the response headers. This returns a result holding only those
    /// headers, or `None` for any other kind of error.
    pub fn partial_from(error: &Error) -> Option<Self> {
        if error.kind() != ErrorKind::Decode {
            return None;
        }

        let header = error.headers()?.clone();
        Some(Self {
            header,
            ..Self::default()
        })
    }

    /// Returns the total number of matching documents, or 0 if unknown.
    pub fn total_hits(&self) -> u64 {
        self.hits
            .as_ref()
            .and_then(|hits| hits.total.as_ref())
            .map_or(0, |total| total.value)
    }

    /// Returns the matching documents.
    pub fn hits(&self) -> &[SearchHit] {
        self.hits.as_ref().map_or(&[], |hits| hits.hits.as_slice())
    }
}

/// Shard statistics of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardsInfo {
    /// Shards the search was sent to.
    pub total: u32,
    /// Shards that answered.
    pub successful: u32,
    /// Shards skipped by the pre-filter phase.
    pub skipped: u32,
    /// Shards that failed.
    pub failed: u32,
}

/// The hits section of a search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHits {
    /// Total number of matching documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,
    /// Highest score among the hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    /// The returned documents.
    pub hits: Vec<SearchHit>,
}

/// Total hit count and whether it is exact.
///
/// Also decodes the bare integer sent with `rest_total_hits_as_int`, which
/// is always exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TotalHitsRepr")]
pub struct TotalHits {
    /// Number of matching documents.
    pub value: u64,
    /// `eq` when exact, `gte` when a lower bound.
    pub relation: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHitsRepr {
    Count(u64),
    Object { value: u64, relation: String },
}

impl From<TotalHitsRepr> for TotalHits {
    fn from(repr: TotalHitsRepr) -> Self {
        match repr {
            TotalHitsRepr::Count(value) => Self {
                value,
                relation: "eq".to_owned(),
            },
            TotalHitsRepr::Object { value, relation } => Self { value, relation },
        }
    }
}

/// A single matching document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    /// Index the document lives in.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Relevance score.
    #[serde(rename = "_score", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Stored document source.
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    /// Requested fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
    /// Highlighted fragments per field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HashMap<String, Vec<String>>>,
    /// Sort values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Value>,
    /// Names of the named queries that matched.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_queries: Vec<String>,
}

impl SearchHit {
    /// Deserializes the document source into `T`.
    ///
    /// Returns `Ok(None)` when the hit carries no source.
    pub fn source_as<T>(&self) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(source) = &self.source else {
            return Ok(None);
        };

        T::deserialize(source).map(Some).map_err(|error| {
            Error::decode()
                .with_message(format!("unexpected source shape in hit {:?}", self.id))
                .with_source(error)
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "took": 5,
            "timed_out": false,
            "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0},
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.3,
                "hits": [
                    {"_index": "books", "_id": "1", "_score": 1.3, "_source": {"title": "The Hobbit"}},
                    {"_index": "books", "_id": "2", "_score": 0.7, "matched_queries": ["by_author"]}
                ]
            }
        })
    }

    #[test]
    fn test_decode_search_result() {
        let result: SearchResult = serde_json::from_value(sample()).unwrap();
        assert_eq!(result.took, Some(5));
        assert!(!result.timed_out);
        assert_eq!(result.shards.as_ref().unwrap().successful, 1);
        assert_eq!(result.total_hits(), 2);
        assert_eq!(result.hits().len(), 2);
        assert_eq!(result.hits()[1].matched_queries, vec!["by_author"]);
        assert!(result.header.is_empty());
    }

    #[test]
    fn test_total_hits_as_int() {
        let result: SearchResult =
            serde_json::from_value(json!({"hits": {"total": 7, "hits": []}})).unwrap();
        assert_eq!(result.total_hits(), 7);

        let total = result.hits.unwrap().total.unwrap();
        assert_eq!(total.relation, "eq");
        assert_eq!(
            serde_json::to_value(&total).unwrap(),
            json!({"value": 7, "relation": "eq"})
        );
    }

    #[test]
    fn test_empty_result() {
        let result: SearchResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result.total_hits(), 0);
        assert!(result.hits().is_empty());
    }

    #[test]
    fn test_source_as() {
        #[derive(Deserialize)]
        struct Book {
            title: String,
        }

        let result: SearchResult = serde_json::from_value(sample()).unwrap();
        let book: Book = result.hits()[0].source_as().unwrap().unwrap();
        assert_eq!(book.title, "The Hobbit");
        assert!(result.hits()[1].source_as::<Book>().unwrap().is_none());
    }

    #[test]
    fn test_partial_from_decode_error() {
        let mut headers = HeaderMap::new();
        headers.insert("x-elastic-product", HeaderValue::from_static("Elasticsearch"));

        let error = Error::decode().with_headers(headers);
        let partial = SearchResult::partial_from(&error).unwrap();
        assert_eq!(partial.header["x-elastic-product"], "Elasticsearch");
        assert!(partial.hits.is_none());

        assert!(SearchResult::partial_from(&Error::network_error()).is_none());
    }
}
