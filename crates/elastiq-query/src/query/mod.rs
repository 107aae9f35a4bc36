//! The [`Query`] contract and its builders.
//!
//! A query is anything that can render itself as a JSON document of the
//! search engine's query DSL. Builders are plain values: they accumulate
//! fields through chained `with_*` setters and render on demand through
//! [`Query::source`], so a builder can be rendered any number of times.
//!
//! Queries compose by holding other queries as trait objects. A composite
//! builder calls `source()` on each nested query and embeds the returned
//! document, failing as soon as one nested query fails.

mod knn;
mod match_all;
mod raw;
mod term;

use std::fmt;

pub use knn::KnnQuery;
pub use match_all::MatchAllQuery;
pub use raw::RawStringQuery;
pub use term::TermQuery;

use serde_json::{Number, Value};

use crate::{Error, Result};

/// A semantic JSON document ready for wire serialization.
///
/// Object keys carry no ordering guarantee; array elements keep their order.
pub type Document = serde_json::Value;

/// A search predicate that renders to a query DSL document.
pub trait Query: fmt::Debug + Send + Sync {
    /// Renders the query into its wire document.
    fn source(&self) -> Result<Document>;
}

impl<Q: Query + ?Sized> Query for Box<Q> {
    fn source(&self) -> Result<Document> {
        (**self).source()
    }
}

impl<Q: Query + ?Sized> Query for &Q {
    fn source(&self) -> Result<Document> {
        (**self).source()
    }
}

impl<Q: Query + ?Sized> Query for std::sync::Arc<Q> {
    fn source(&self) -> Result<Document> {
        (**self).source()
    }
}

/// Converts `value` into a JSON number, rejecting NaN and infinities.
///
/// `serde_json` renders non-finite floats as `null`, which the engine would
/// silently misread.
pub(crate) fn finite_number(query: &'static str, name: &str, value: f64) -> Result<Value> {
    Number::from_f64(value).map(Value::Number).ok_or_else(|| {
        Error::invalid_query(query, format!("{name} is not a finite number: {value}"))
    })
}
