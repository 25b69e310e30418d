//! Request/response payload exchanged with the send function

use http::Method;
use serde_json::{Map, Value};

use crate::EsError;

/// Key the raw body is stored under when it isn't a JSON object
pub const RESULTS_KEY: &str = "results";

/// A single Elasticsearch call
///
/// The caller fills in `method`, `uri`, and `request_body`. The send function
/// fills in `status_code`, `raw_response_body`, `response_body`, and `error`.
#[derive(Debug, Clone)]
pub struct EsRequest {
    /// HTTP method
    pub method: Method,
    /// Request path, also the endpoint key (e.g. `/idx/_search`)
    pub uri: String,
    /// Request body, empty for bodiless calls
    pub request_body: String,
    /// Response status code, 0 until a response arrives
    pub status_code: u16,
    /// Unparsed response body
    pub raw_response_body: String,
    /// Response body parsed as a JSON object
    pub response_body: Map<String, Value>,
    /// Transport-level failure, if any
    pub error: Option<EsError>,
}

impl EsRequest {
    /// Create an unsent request
    pub fn new(method: Method, uri: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            request_body: body.into(),
            status_code: 0,
            raw_response_body: String::new(),
            response_body: Map::new(),
            error: None,
        }
    }

    /// Whether a response arrived with a 2xx status and no error
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status_code)
    }
}

/// Parse a response body as a JSON object
///
/// Anything that isn't a JSON object is returned as `{"results": raw}`.
pub fn parse_response_body(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(body) => body,
        Err(_) => {
            let mut body = Map::new();
            body.insert(RESULTS_KEY.to_string(), Value::String(raw.to_string()));
            body
        }
    }
}
