//! In-memory transport for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! elastiq-client = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use elastiq_client::Client;
//! use elastiq_client::mock::MockTransport;
//!
//! let transport = MockTransport::new().with_json(serde_json::json!({"took": 1}));
//! let client = Client::new(transport.clone());
//!
//! client.search_template().with_id("t").send().await?;
//! assert_eq!(transport.requests()[0].path, "_search/template");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::StatusCode;

use crate::transport::{PerformRequestOptions, RawResponse, Transport};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<Result<RawResponse>>,
    requests: Vec<PerformRequestOptions>,
    hanging: bool,
}

/// Transport that records requests and replays queued replies in order.
///
/// Clones share state, so a test can keep one handle for inspection while the
/// client owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Creates a transport with no queued replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw response.
    #[must_use]
    pub fn with_response(self, response: RawResponse) -> Self {
        self.lock().replies.push_back(Ok(response));
        self
    }

    /// Queues a `200 OK` response with a JSON body.
    #[must_use]
    pub fn with_json(self, body: serde_json::Value) -> Self {
        self.with_response(RawResponse::new(StatusCode::OK, body.to_string()))
    }

    /// Queues a transport failure.
    #[must_use]
    pub fn with_error(self, error: Error) -> Self {
        self.lock().replies.push_back(Err(error));
        self
    }

    /// Makes every request wait forever, for exercising cancellation.
    #[must_use]
    pub fn hanging(self) -> Self {
        self.lock().hanging = true;
        self
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<PerformRequestOptions> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn perform_request(&self, options: PerformRequestOptions) -> Result<RawResponse> {
        let (reply, hanging) = {
            let mut state = self.lock();
            state.requests.push(options);
            let reply = if state.hanging {
                None
            } else {
                state.replies.pop_front()
            };
            (reply, state.hanging)
        };

        if hanging {
            return std::future::pending().await;
        }

        reply.unwrap_or_else(|| {
            Err(Error::network_error().with_message("no mock reply queued"))
        })
    }
}
