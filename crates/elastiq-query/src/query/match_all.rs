use serde_json::{Map, Value, json};

use super::{Document, Query, finite_number};
use crate::Result;

/// Matches every document, giving each a score of `boost` (1.0 by default).
#[derive(Debug, Clone, Default)]
pub struct MatchAllQuery {
    boost: Option<f64>,
    query_name: Option<String>,
}

impl MatchAllQuery {
    /// Creates a new match-all query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the constant score given to every document.
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

impl Query for MatchAllQuery {
    fn source(&self) -> Result<Document> {
        let mut params = Map::new();
        if let Some(boost) = self.boost {
            params.insert("boost".into(), finite_number("match_all", "boost", boost)?);
        }
        if let Some(query_name) = &self.query_name {
            params.insert("_name".into(), Value::from(query_name.as_str()));
        }
        Ok(json!({ "match_all": params }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_match_all() {
        let source = MatchAllQuery::new().source().unwrap();
        assert_eq!(source, json!({"match_all": {}}));
    }

    #[test]
    fn test_match_all_with_boost() {
        let source = MatchAllQuery::new().with_boost(1.2).source().unwrap();
        assert_eq!(source, json!({"match_all": {"boost": 1.2}}));
    }
}
