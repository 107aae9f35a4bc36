//! Query-string parameter encoding.
//!
//! [`Params`] is the flat, string-keyed parameter set appended to a request
//! URL. Keys are kept sorted so that the encoded query string is stable.
//! Structured values are flattened by the helpers below: optional flags are
//! written only when present, lists are comma-joined, and nested documents
//! are JSON-encoded into a single value.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Error, Result};

/// String-keyed transport parameters for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Sets a boolean flag as `true`/`false`. Unset flags are left out.
    pub fn set_flag(&mut self, name: impl Into<String>, flag: Option<bool>) {
        if let Some(flag) = flag {
            self.set(name, flag.to_string());
        }
    }

    /// Sets a comma-joined list. Empty lists are left out.
    pub fn set_list<S: AsRef<str>>(&mut self, name: impl Into<String>, values: &[S]) {
        if values.is_empty() {
            return;
        }

        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        self.set(name, joined);
    }

    /// Sets `name` to the JSON text of `value`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Encoding`](crate::ErrorKind::Encoding) error if
    /// `value` cannot be serialized to JSON.
    pub fn set_json<T>(&mut self, name: impl Into<String>, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let name = name.into();
        let encoded = serde_json::to_string(value).map_err(|error| {
            Error::encoding()
                .with_message(format!("failed to encode `{name}` parameter"))
                .with_source(error)
        })?;
        self.set(name, encoded);
        Ok(())
    }

    /// Returns the value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns whether `name` is set.
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the parameters as an `application/x-www-form-urlencoded` string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_flags_only_when_set() {
        let mut params = Params::new();
        params.set_flag("pretty", Some(true));
        params.set_flag("human", Some(false));
        params.set_flag("error_trace", None);

        assert_eq!(params.get("pretty"), Some("true"));
        assert_eq!(params.get("human"), Some("false"));
        assert!(!params.contains_key("error_trace"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_list_is_comma_joined() {
        let mut params = Params::new();
        params.set_list("filter_path", &["hits.hits._id", "took"]);
        params.set_list::<String>("empty", &[]);

        assert_eq!(params.get("filter_path"), Some("hits.hits._id,took"));
        assert!(!params.contains_key("empty"));
    }

    #[test]
    fn test_json_value() {
        let mut params = Params::new();
        params.set_json("params", &json!({"a": 1})).unwrap();
        assert_eq!(params.get("params"), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_json_encoding_failure() {
        let mut unencodable = BTreeMap::new();
        unencodable.insert((1, 2), "tuple keys are not valid JSON object keys");

        let mut params = Params::new();
        let error = params.set_json("params", &unencodable).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Encoding);
        assert!(!params.contains_key("params"));
    }

    #[test]
    fn test_query_string_is_sorted_and_escaped() {
        let mut params = Params::new();
        params.set("format", "json");
        params.set_json("params", &json!({"q": "a b"})).unwrap();
        params.set("id", "my-template");

        assert_eq!(
            params.to_query_string(),
            "format=json&id=my-template&params=%7B%22q%22%3A%22a+b%22%7D"
        );
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let params: Params = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"a": "1", "b": "2"})
        );
    }
}
