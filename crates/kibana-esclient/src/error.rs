//! Elasticsearch client errors

use http::Method;
use thiserror::Error;

/// Error attached to an [`EsRequest`](crate::EsRequest) or returned by the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EsError {
    /// The fake transport had no scripted response left for the endpoint
    #[error("no fake response found for uri {uri} ({method} body={body:?})")]
    NoFakeResponse {
        /// Endpoint key the call was made to
        uri: String,
        /// Request method
        method: Method,
        /// Request body that was sent
        body: String,
    },

    /// The transport failed before a response was received
    #[error("transport error for {uri}: {message}")]
    Transport {
        /// Endpoint the call was made to
        uri: String,
        /// Description of what failed
        message: String,
    },

    /// Elasticsearch answered with a non-success status
    #[error("unexpected status {code} from {uri}: {body}")]
    Status {
        /// Endpoint the call was made to
        uri: String,
        /// HTTP status code
        code: u16,
        /// Raw response body
        body: String,
    },
}

impl EsError {
    /// Create a transport error
    pub fn transport(uri: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            uri: uri.into(),
            message: msg.into(),
        }
    }
}
