//! Approximate k-nearest-neighbour query.

use serde_json::{Map, Value, json};

use super::{Document, Query, finite_number};
use crate::Result;

/// Finds the `k` nearest vectors to a query vector in a dense vector field.
///
/// Renders as:
///
/// ```json
/// {
///   "knn": {
///     "field": "embedding",
///     "k": 10,
///     "num_candidates": 100,
///     "query_vector": [1.0, 2.0, 3.0],
///     "boost": 1.0,
///     "filter": { "term": { "field": "value" } }
///   }
/// }
/// ```
///
/// `boost` is emitted only when set. A single post-filter is inlined as a bare
/// object while two or more are emitted as an array; the engine treats those
/// two shapes differently, so they are not interchangeable.
#[derive(Debug)]
pub struct KnnQuery {
    field: String,
    k: usize,
    num_candidates: usize,
    query_vector: Vec<f64>,
    boost: Option<f64>,
    filter: Vec<Box<dyn Query>>,
}

impl KnnQuery {
    /// Creates a new kNN query over `field`.
    pub fn new(
        field: impl Into<String>,
        k: usize,
        num_candidates: usize,
        query_vector: impl Into<Vec<f64>>,
    ) -> Self {
        Self {
            field: field.into(),
            k,
            num_candidates,
            query_vector: query_vector.into(),
            boost: None,
            filter: Vec::new(),
        }
    }

    /// Sets the name of the vector field to search.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Sets the number of nearest neighbours to return.
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the number of candidates considered per shard.
    #[must_use]
    pub fn with_num_candidates(mut self, num_candidates: usize) -> Self {
        self.num_candidates = num_candidates;
        self
    }

    /// Sets the query vector.
    #[must_use]
    pub fn with_query_vector(mut self, query_vector: impl Into<Vec<f64>>) -> Self {
        self.query_vector = query_vector.into();
        self
    }

    /// Sets the relevance boost. `None` leaves the engine default in place.
    #[must_use]
    pub fn with_boost(mut self, boost: impl Into<Option<f64>>) -> Self {
        self.boost = boost.into();
        self
    }

    /// Appends a post-filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Query + 'static) -> Self {
        self.filter.push(Box::new(filter));
        self
    }

    /// Replaces all post-filters.
    #[must_use]
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = Box<dyn Query>>) -> Self {
        self.filter = filters.into_iter().collect();
        self
    }

    /// Returns the vector field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the number of nearest neighbours to return.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the number of candidates considered per shard.
    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    /// Returns the query vector.
    pub fn query_vector(&self) -> &[f64] {
        &self.query_vector
    }

    /// Returns the boost, if one was set.
    pub fn boost(&self) -> Option<f64> {
        self.boost
    }

    /// Returns the number of post-filters.
    pub fn filter_count(&self) -> usize {
        self.filter.len()
    }
}

impl Query for KnnQuery {
    fn source(&self) -> Result<Document> {
        let mut knn = Map::new();
        knn.insert("field".into(), Value::from(self.field.as_str()));
        knn.insert("k".into(), Value::from(self.k));
        knn.insert("num_candidates".into(), Value::from(self.num_candidates));
        let query_vector = self
            .query_vector
            .iter()
            .map(|&value| finite_number("knn", "query_vector element", value))
            .collect::<Result<Vec<_>>>()?;
        knn.insert("query_vector".into(), Value::Array(query_vector));

        if let Some(boost) = self.boost {
            knn.insert("boost".into(), finite_number("knn", "boost", boost)?);
        }

        match self.filter.as_slice() {
            [] => {}
            [single] => {
                knn.insert("filter".into(), single.source()?);
            }
            many => {
                let filters = many
                    .iter()
                    .map(|filter| filter.source())
                    .collect::<Result<Vec<_>>>()?;
                knn.insert("filter".into(), Value::Array(filters));
            }
        }

        Ok(json!({ "knn": knn }))
    }
}
