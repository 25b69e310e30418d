//! Ordered fake transport for driving [`EsClient`] in tests
//!
//! [`FakeChatter`] holds scripted responses per endpoint and records every
//! call made through it. Responses and captured requests are both consumed
//! FIFO per endpoint. Every call gets a sequence number from a single
//! counter shared by all endpoints, so tests can check ordering across
//! endpoints.
//!
//! The counter and both tables sit behind one lock. A simulated call takes
//! the lock once to number, record, and answer the request, so sequence
//! order always matches call order even with concurrent callers.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use http::Method;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::request::parse_response_body;
use crate::{EsClient, EsError, EsRequest, SendRequestFn};

/// A call captured by the fake transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeRequest {
    /// Endpoint key
    pub uri: String,
    /// Request method
    pub method: Method,
    /// Request body
    pub body: String,
    /// Position of this call among all calls, starting at 1
    pub seq_no: u64,
}

/// A scripted response
#[derive(Debug, Clone, Default)]
pub struct FakeResponse {
    /// Transport error to report instead of a response
    pub error: Option<EsError>,
    /// HTTP status code
    pub status_code: u16,
    /// Raw response body
    pub body: String,
}

impl FakeResponse {
    /// A response with the given status and body
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            error: None,
            status_code,
            body: body.into(),
        }
    }

    /// A response that fails with a transport error
    pub fn error(error: EsError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    /// Body parsed as a JSON object, or `{"results": body}`
    pub fn body_as_response_body(&self) -> Map<String, Value> {
        parse_response_body(&self.body)
    }
}

#[derive(Debug, Default)]
struct ChatterState {
    seq_no: u64,
    requests: HashMap<String, VecDeque<FakeRequest>>,
    responses: HashMap<String, VecDeque<FakeResponse>>,
}

impl ChatterState {
    fn next_seq_no(&mut self) -> u64 {
        let next = self.seq_no;
        self.seq_no += 1;
        next
    }
}

/// Scripted request/response table with ordered call capture
#[derive(Debug)]
pub struct FakeChatter {
    state: Mutex<ChatterState>,
}

impl FakeChatter {
    /// Create a chatter scripted with responses per endpoint
    ///
    /// Takes the table by value; callers that reuse a table across tests
    /// pass a clone, so no two chatters share queues.
    pub fn new<I, K, R>(responses: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: IntoIterator<Item = FakeResponse>,
    {
        let responses = responses
            .into_iter()
            .map(|(key, res)| (key.into(), res.into_iter().collect()))
            .collect();

        Self {
            state: Mutex::new(ChatterState {
                seq_no: 1,
                requests: HashMap::new(),
                responses,
            }),
        }
    }

    /// Pop the oldest captured call for `key`
    pub fn get_request(&self, key: &str) -> Option<FakeRequest> {
        self.state.lock().requests.get_mut(key)?.pop_front()
    }

    /// Pop the next scripted response for `key`
    pub fn get_response(&self, key: &str) -> Option<FakeResponse> {
        self.state.lock().responses.get_mut(key)?.pop_front()
    }

    /// Number of captured calls for `key` not yet retrieved
    pub fn pending_requests(&self, key: &str) -> usize {
        self.state.lock().requests.get(key).map_or(0, VecDeque::len)
    }

    /// Number of scripted responses for `key` not yet dispensed
    pub fn pending_responses(&self, key: &str) -> usize {
        self.state.lock().responses.get(key).map_or(0, VecDeque::len)
    }

    /// Simulate a call: record it, then answer from the script
    ///
    /// With no scripted response left the payload gets
    /// [`EsError::NoFakeResponse`].
    pub fn simulate(&self, payload: &mut EsRequest) {
        let key = payload.uri.clone();

        let response = {
            let mut state = self.state.lock();
            let seq_no = state.next_seq_no();
            state
                .requests
                .entry(key.clone())
                .or_default()
                .push_back(FakeRequest {
                    uri: key.clone(),
                    method: payload.method.clone(),
                    body: payload.request_body.clone(),
                    seq_no,
                });
            debug!(uri = %key, seq_no, "captured fake request");
            state.responses.get_mut(&key).and_then(VecDeque::pop_front)
        };

        match response {
            Some(response) => {
                payload.response_body = response.body_as_response_body();
                payload.error = response.error;
                payload.status_code = response.status_code;
                payload.raw_response_body = response.body;
            }
            None => {
                payload.error = Some(EsError::NoFakeResponse {
                    uri: key,
                    method: payload.method.clone(),
                    body: payload.request_body.clone(),
                });
            }
        }
    }
}

/// Send function that routes every call through `chatter`
pub fn new_fake_send_request_fn(chatter: Arc<FakeChatter>) -> SendRequestFn {
    Arc::new(move |_: &str, _: &str, payload: &mut EsRequest| chatter.simulate(payload))
}

/// Client for `cluster`/`namespace` wired to `chatter`
pub fn new_fake_client(
    cluster: impl Into<String>,
    namespace: impl Into<String>,
    chatter: Arc<FakeChatter>,
) -> EsClient {
    EsClient::new(cluster, namespace, new_fake_send_request_fn(chatter))
}
