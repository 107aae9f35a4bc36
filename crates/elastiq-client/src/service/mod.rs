//! Request builders for engine endpoints.
//!
//! Each service follows the same two-phase shape: a pure `build_url` that
//! turns the builder state into a path and query parameters, and an async
//! `send` that validates, builds, performs the request and decodes the typed
//! result. Builders borrow the shared [`Client`](crate::Client) and keep no
//! state between calls, so `send` can be invoked repeatedly.

mod search_result;
mod search_template;

pub use search_result::{SearchHit, SearchHits, SearchResult, ShardsInfo, TotalHits};
pub use search_template::{SearchTemplateBody, SearchTemplateService};
