//! Exact term query.

use serde_json::{Map, Value, json};

use super::{Document, Query, finite_number};
use crate::{Error, Result};

/// Matches documents whose `field` contains exactly `value`.
///
/// Renders in the short form `{"term": {"field": "value"}}` unless a boost or
/// query name is set, in which case the long form with a `value` key is used.
#[derive(Debug, Clone)]
pub struct TermQuery {
    field: String,
    value: Value,
    boost: Option<f64>,
    query_name: Option<String>,
}

impl TermQuery {
    /// Creates a new term query.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            boost: None,
            query_name: None,
        }
    }

    /// Sets the relevance boost.
    #[must_use]
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Sets the name reported back in `matched_queries`.
    #[must_use]
    pub fn with_query_name(mut self, query_name: impl Into<String>) -> Self {
        self.query_name = Some(query_name.into());
        self
    }
}

impl Query for TermQuery {
    fn source(&self) -> Result<Document> {
        if self.field.is_empty() {
            return Err(Error::invalid_query("term", "field name is empty"));
        }

        let mut term = Map::new();
        if self.boost.is_none() && self.query_name.is_none() {
            term.insert(self.field.clone(), self.value.clone());
        } else {
            let mut params = Map::new();
            params.insert("value".into(), self.value.clone());
            if let Some(boost) = self.boost {
                params.insert("boost".into(), finite_number("term", "boost", boost)?);
            }
            if let Some(query_name) = &self.query_name {
                params.insert("_name".into(), Value::from(query_name.as_str()));
            }
            term.insert(self.field.clone(), Value::Object(params));
        }

        Ok(json!({ "term": term }))
    }
}
