//! Templated search.
//!
//! See <https://www.elastic.co/guide/en/elasticsearch/reference/current/search-template-api.html>.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::SearchResult;
use crate::path::PathTemplate;
use crate::transport::PerformRequestOptions;
use crate::{Client, Error, Params, Result, TRACING_TARGET_SERVICE};

/// Path of a templated search scoped to one index.
const INDEX_PATH: PathTemplate<'static> = PathTemplate::new("{index}/_search/template");

/// Path of a templated search over all indices.
const GLOBAL_PATH: &str = "_search/template";

/// Runs a stored or inline search template.
///
/// # Examples
///
/// ```rust,ignore
/// let result = client
///     .search_template()
///     .with_index("books")
///     .with_id("by-author")
///     .with_param("author", "tolkien")
///     .with_filter_path(["hits.hits._source", "took"])
///     .send()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SearchTemplateService<'a> {
    client: &'a Client,

    pretty: Option<bool>,
    human: Option<bool>,
    error_trace: Option<bool>,
    filter_path: Vec<String>,
    headers: Vec<(String, String)>,

    index: Option<String>,
    id: Option<String>,
    source: Option<String>,
    params: Option<Map<String, Value>>,
}

/// Wire body of a templated search.
///
/// Kept separate from the builder so that adding builder options (headers,
/// flags) never changes what goes over the wire.
#[derive(Debug, Clone, Serialize)]
pub struct SearchTemplateBody<'a> {
    /// Target index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<&'a str>,
    /// Stored template id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    /// Inline template source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
    /// Template parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<&'a Map<String, Value>>,
}

impl<'a> SearchTemplateService<'a> {
    /// Creates a new templated search bound to `client`.
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            pretty: None,
            human: None,
            error_trace: None,
            filter_path: Vec::new(),
            headers: Vec::new(),
            index: None,
            id: None,
            source: None,
            params: None,
        }
    }

    /// Tells the engine whether to return a formatted JSON response.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = Some(pretty);
        self
    }

    /// Specifies whether human readable values should be returned in the
    /// response, e.g. `"7.5mb"`.
    #[must_use]
    pub fn with_human(mut self, human: bool) -> Self {
        self.human = Some(human);
        self
    }

    /// Specifies whether to include the stack trace of returned errors.
    #[must_use]
    pub fn with_error_trace(mut self, error_trace: bool) -> Self {
        self.error_trace = Some(error_trace);
        self
    }

    /// Sets the filters used to reduce the response.
    #[must_use]
    pub fn with_filter_path<I, S>(mut self, filter_path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_path = filter_path.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces all request headers.
    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = headers
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self
    }

    /// Sets the index to search. An empty name searches all indices.
    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Sets the id of a stored template.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets an inline template source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Replaces the template parameters.
    #[must_use]
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets a single template parameter.
    ///
    /// Values are converted to JSON on the way in. A non-finite float has no
    /// JSON form and is stored as `null`; check floats with
    /// [`f64::is_finite`] before passing them here.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    fn index(&self) -> Option<&str> {
        self.index.as_deref().filter(|index| !index.is_empty())
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Builds the request path and query parameters.
    ///
    /// # Errors
    ///
    /// Fails with a path resolution error if the index cannot be expanded
    /// into the path, or with an encoding error if the template parameters
    /// cannot be serialized.
    pub fn build_url(&self) -> Result<(String, Params)> {
        let path = match self.index() {
            Some(index) => INDEX_PATH.expand(&[("index", index)])?,
            None => GLOBAL_PATH.to_owned(),
        };

        let mut params = Params::new();
        params.set("format", "json");
        params.set_flag("pretty", self.pretty);
        params.set_flag("human", self.human);
        params.set_flag("error_trace", self.error_trace);
        params.set_list("filter_path", self.filter_path.as_slice());
        if let Some(id) = self.id() {
            params.set("id", id);
        }
        if let Some(template_params) = &self.params {
            params.set_json("params", template_params)?;
        }

        Ok((path, params))
    }

    /// Returns the request body.
    pub fn body(&self) -> SearchTemplateBody<'_> {
        SearchTemplateBody {
            index: self.index(),
            id: self.id(),
            source: self.source.as_deref(),
            params: self.params.as_ref(),
        }
    }

    /// Checks that the request is well formed before anything is sent.
    ///
    /// # Errors
    ///
    /// Fails with an invalid input error if a header name or value cannot be
    /// sent over HTTP.
    pub fn validate(&self) -> Result<()> {
        self.header_map().map(drop)
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
                Error::invalid_input()
                    .with_message(format!("invalid header name `{name}`"))
                    .with_source(error)
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                Error::invalid_input()
                    .with_message(format!("invalid value for header `{name}`"))
                    .with_source(error)
            })?;
            headers.append(header_name, header_value);
        }
        Ok(headers)
    }

    /// Executes the search and returns the decoded result.
    pub async fn send(&self) -> Result<SearchResult> {
        self.send_with_cancellation(&CancellationToken::new()).await
    }

    /// Executes the search, giving up as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// Encoding and path errors are returned before any request is made.
    /// Transport errors are returned unchanged. If the response body cannot
    /// be decoded, the returned [`ErrorKind::Decode`](crate::ErrorKind::Decode)
    /// error carries the response headers; see [`SearchResult::partial_from`].
    pub async fn send_with_cancellation(&self, cancel: &CancellationToken) -> Result<SearchResult> {
        self.validate()?;

        let (path, params) = self.build_url()?;
        let body = serde_json::to_vec(&self.body()).map_err(|error| {
            Error::encoding()
                .with_message("failed to encode search template body")
                .with_source(error)
        })?;

        tracing::debug!(
            target: TRACING_TARGET_SERVICE,
            path = %path,
            index = ?self.index(),
            id = ?self.id(),
            inline = self.source.is_some(),
            "Running search template"
        );

        let options = PerformRequestOptions::new(Method::POST, path)
            .with_params(params)
            .with_body(body)
            .with_headers(self.header_map()?);

        let response = self.client.perform_request(cancel, options).await?;

        match self.client.decode::<SearchResult>(&response.body) {
            Ok(mut result) => {
                result.header = response.headers;
                Ok(result)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVICE,
                    error = %error,
                    "Search template response could not be decoded"
                );
                Err(error.with_headers(response.headers))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;
    use crate::mock::MockTransport;
    use crate::transport::RawResponse;

    fn search_response() -> Value {
        json!({
            "took": 2,
            "timed_out": false,
            "hits": {
                "total": {"value": 1, "relation": "eq"},
                "hits": [{"_index": "my-index", "_id": "1", "_score": 1.0}]
            }
        })
    }

    #[test]
    fn test_path_with_index() {
        let client = Client::new(MockTransport::new());
        let (path, _) = client.search_template().with_index("my-index").build_url().unwrap();
        assert_eq!(path, "my-index/_search/template");
    }

    #[test]
    fn test_path_without_index() {
        let client = Client::new(MockTransport::new());
        let (path, _) = client.search_template().build_url().unwrap();
        assert_eq!(path, "_search/template");

        let (path, _) = client.search_template().with_index("").build_url().unwrap();
        assert_eq!(path, "_search/template");
    }

    #[test]
    fn test_path_escapes_index() {
        let client = Client::new(MockTransport::new());
        let (path, _) = client.search_template().with_index("a/b").build_url().unwrap();
        assert_eq!(path, "a%2Fb/_search/template");
    }

    #[test]
    fn test_format_is_always_json() {
        let client = Client::new(MockTransport::new());
        let (_, params) = client.search_template().build_url().unwrap();
        assert_eq!(params.get("format"), Some("json"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_flags_only_when_set() {
        let client = Client::new(MockTransport::new());

        let (_, params) = client
            .search_template()
            .with_pretty(true)
            .with_human(false)
            .build_url()
            .unwrap();
        assert_eq!(params.get("pretty"), Some("true"));
        assert_eq!(params.get("human"), Some("false"));
        assert!(!params.contains_key("error_trace"));

        let (_, params) = client.search_template().build_url().unwrap();
        assert!(!params.contains_key("pretty"));
        assert!(!params.contains_key("human"));

        let (_, params) = client.search_template().with_error_trace(true).build_url().unwrap();
        assert_eq!(params.get("error_trace"), Some("true"));
    }

    #[test]
    fn test_filter_path_and_id() {
        let client = Client::new(MockTransport::new());
        let (_, params) = client
            .search_template()
            .with_filter_path(["hits.hits._id", "took"])
            .with_id("my-template")
            .build_url()
            .unwrap();
        assert_eq!(params.get("filter_path"), Some("hits.hits._id,took"));
        assert_eq!(params.get("id"), Some("my-template"));

        let (_, params) = client
            .search_template()
            .with_filter_path(Vec::<String>::new())
            .build_url()
            .unwrap();
        assert!(!params.contains_key("filter_path"));
        assert!(!params.contains_key("id"));
    }

    #[test]
    fn test_params_are_json_encoded() {
        let client = Client::new(MockTransport::new());
        let (_, params) = client
            .search_template()
            .with_param("a", 1)
            .build_url()
            .unwrap();
        assert_eq!(params.get("params"), Some(r#"{"a":1}"#));

        let (_, params) = client.search_template().build_url().unwrap();
        assert!(!params.contains_key("params"));
    }

    #[test]
    fn test_non_finite_param_becomes_null() {
        let client = Client::new(MockTransport::new());
        let (_, params) = client
            .search_template()
            .with_param("score", f64::NAN)
            .build_url()
            .unwrap();
        assert_eq!(params.get("params"), Some(r#"{"score":null}"#));
    }

    #[test]
    fn test_body_mirrors_request_fields() {
        let client = Client::new(MockTransport::new());
        let service = client
            .search_template()
            .with_index("my-index")
            .with_id("my-template")
            .with_param("a", 1)
            .with_pretty(true)
            .with_header("x-opaque-id", "abc");

        let body = serde_json::to_value(service.body()).unwrap();
        assert_eq!(
            body,
            json!({"index": "my-index", "id": "my-template", "params": {"a": 1}})
        );

        let empty = serde_json::to_value(client.search_template().body()).unwrap();
        assert_eq!(empty, json!({}));
    }

    #[test]
    fn test_validate_rejects_bad_headers() {
        let client = Client::new(MockTransport::new());
        assert!(client.search_template().validate().is_ok());

        let error = client
            .search_template()
            .with_header("bad header", "value")
            .validate()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let error = client
            .search_template()
            .with_header("x-ok", "line\nbreak")
            .validate()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_send_builds_request() {
        let transport = MockTransport::new().with_json(search_response());
        let client = Client::new(transport.clone());

        let result = client
            .search_template()
            .with_index("my-index")
            .with_id("my-template")
            .with_param("a", 1)
            .with_header("x-opaque-id", "abc")
            .send()
            .await
            .unwrap();
        assert_eq!(result.total_hits(), 1);
        assert_eq!(result.hits()[0].id.as_deref(), Some("1"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "my-index/_search/template");
        assert_eq!(request.params.get("format"), Some("json"));
        assert_eq!(request.params.get("id"), Some("my-template"));
        assert_eq!(request.params.get("params"), Some(r#"{"a":1}"#));
        assert_eq!(request.headers["x-opaque-id"], "abc");

        let body: Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"index": "my-index", "id": "my-template", "params": {"a": 1}})
        );
    }

    #[tokio::test]
    async fn test_send_attaches_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-elastic-product", HeaderValue::from_static("Elasticsearch"));
        let transport = MockTransport::new().with_response(
            RawResponse::new(StatusCode::OK, search_response().to_string()).with_headers(headers),
        );
        let client = Client::new(transport);

        let result = client.search_template().with_id("t").send().await.unwrap();
        assert_eq!(result.header["x-elastic-product"], "Elasticsearch");
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("7"));
        let transport = MockTransport::new().with_response(
            RawResponse::new(StatusCode::OK, "<html>not json</html>").with_headers(headers),
        );
        let client = Client::new(transport);

        let error = client.search_template().with_id("t").send().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Decode);

        let partial = SearchResult::partial_from(&error).unwrap();
        assert_eq!(partial.header["x-ratelimit-remaining"], "7");
    }

    #[tokio::test]
    async fn test_transport_failure_has_no_result() {
        let transport = MockTransport::new()
            .with_error(Error::timeout().with_message("deadline exceeded"));
        let client = Client::new(transport);

        let error = client.search_template().with_id("t").send().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert!(SearchResult::partial_from(&error).is_none());
    }

    #[tokio::test]
    async fn test_invalid_header_fails_before_sending() {
        let transport = MockTransport::new().with_json(search_response());
        let client = Client::new(transport.clone());

        let error = client
            .search_template()
            .with_header("bad header", "value")
            .send()
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_send() {
        let transport = MockTransport::new().hanging();
        let client = Client::new(transport);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = client
            .search_template()
            .with_id("t")
            .send_with_cancellation(&cancel)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_send_is_repeatable() {
        let transport = MockTransport::new()
            .with_json(search_response())
            .with_json(search_response());
        let client = Client::new(transport.clone());

        let service = client.search_template().with_index("my-index").with_id("t");
        let first = service.send().await.unwrap();
        let second = service.send().await.unwrap();
        assert_eq!(first.total_hits(), second.total_hits());

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, requests[1].path);
        assert_eq!(requests[0].params, requests[1].params);
        assert_eq!(requests[0].body, requests[1].body);
    }
}
