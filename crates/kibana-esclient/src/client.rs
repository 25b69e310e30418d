//! Cluster-scoped Elasticsearch client over a replaceable send function

use std::sync::Arc;

use http::Method;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{EsError, EsRequest};

/// Transport hook: `(cluster, namespace, payload)`, fills in the response
pub type SendRequestFn = Arc<dyn Fn(&str, &str, &mut EsRequest) + Send + Sync>;

/// Elasticsearch client for one cluster
#[derive(Clone)]
pub struct EsClient {
    cluster: String,
    namespace: String,
    send_request: SendRequestFn,
}

impl EsClient {
    /// Create a client that sends through `send_request`
    pub fn new(
        cluster: impl Into<String>,
        namespace: impl Into<String>,
        send_request: SendRequestFn,
    ) -> Self {
        Self {
            cluster: cluster.into(),
            namespace: namespace.into(),
            send_request,
        }
    }

    /// Replace the transport
    pub fn set_send_request_fn(&mut self, send_request: SendRequestFn) {
        self.send_request = send_request;
    }

    /// Run a request through the transport and return the filled payload
    ///
    /// No status checking; see [`EsClient::send`].
    pub fn execute(&self, method: Method, uri: &str, body: &str) -> EsRequest {
        let mut payload = EsRequest::new(method, uri, body);
        (self.send_request)(&self.cluster, &self.namespace, &mut payload);
        debug!(
            cluster = %self.cluster,
            namespace = %self.namespace,
            method = %payload.method,
            uri = %payload.uri,
            status = payload.status_code,
            "elasticsearch request"
        );
        payload
    }

    /// Run a request, failing on transport errors and non-2xx statuses
    pub fn send(&self, method: Method, uri: &str, body: &str) -> Result<EsRequest, EsError> {
        let mut payload = self.execute(method, uri, body);
        if let Some(err) = payload.error.take() {
            return Err(err);
        }
        if !payload.is_success() {
            return Err(EsError::Status {
                uri: payload.uri,
                code: payload.status_code,
                body: payload.raw_response_body,
            });
        }
        Ok(payload)
    }

    /// Cluster health status (`green`, `yellow`, `red`)
    pub fn cluster_health(&self) -> Result<String, EsError> {
        let payload = self.send(Method::GET, "/_cluster/health", "")?;
        payload
            .response_body
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                EsError::transport(&payload.uri, "cluster health response has no status")
            })
    }

    /// Whether `index` exists
    pub fn index_exists(&self, index: &str) -> Result<bool, EsError> {
        let mut payload = self.execute(Method::HEAD, &format!("/{}", index), "");
        if let Some(err) = payload.error.take() {
            return Err(err);
        }
        match payload.status_code {
            200 => Ok(true),
            404 => Ok(false),
            code => Err(EsError::Status {
                uri: payload.uri,
                code,
                body: payload.raw_response_body,
            }),
        }
    }

    /// Run a search against `index`, returning the parsed response body
    pub fn search(&self, index: &str, query: &Value) -> Result<Map<String, Value>, EsError> {
        let payload = self.send(
            Method::POST,
            &format!("/{}/_search", index),
            &query.to_string(),
        )?;
        Ok(payload.response_body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::request::parse_response_body;

    fn responding(status: u16, body: &'static str) -> SendRequestFn {
        Arc::new(move |_: &str, _: &str, payload: &mut EsRequest| {
            payload.status_code = status;
            payload.raw_response_body = body.to_string();
            payload.response_body = parse_response_body(body);
        })
    }

    #[test]
    fn send_passes_cluster_and_namespace() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let client = EsClient::new(
            "elasticsearch",
            "openshift-logging",
            Arc::new(move |cluster: &str, namespace: &str, payload: &mut EsRequest| {
                assert_eq!(cluster, "elasticsearch");
                assert_eq!(namespace, "openshift-logging");
                seen.fetch_add(1, Ordering::SeqCst);
                payload.status_code = 200;
            }),
        );

        client.send(Method::GET, "/", "").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_success_status_is_an_error() {
        let client = EsClient::new("es", "ns", responding(500, "boom"));
        let err = client.send(Method::GET, "/_cat/indices", "").unwrap_err();
        assert_eq!(
            err,
            EsError::Status {
                uri: "/_cat/indices".to_string(),
                code: 500,
                body: "boom".to_string(),
            }
        );
    }

    #[test]
    fn transport_error_wins_over_status() {
        let client = EsClient::new(
            "es",
            "ns",
            Arc::new(|_: &str, _: &str, payload: &mut EsRequest| {
                payload.status_code = 200;
                payload.error = Some(EsError::transport(&payload.uri, "connection reset"));
            }),
        );
        assert!(matches!(
            client.cluster_health(),
            Err(EsError::Transport { .. })
        ));
    }

    #[test]
    fn cluster_health_reads_status() {
        let client = EsClient::new("es", "ns", responding(200, r#"{"status":"yellow"}"#));
        assert_eq!(client.cluster_health().unwrap(), "yellow");

        let client = EsClient::new("es", "ns", responding(200, "{}"));
        assert!(client.cluster_health().is_err());
    }

    #[test]
    fn index_exists_maps_404_to_false() {
        let client = EsClient::new("es", "ns", responding(404, ""));
        assert!(!client.index_exists("app-000001").unwrap());

        let client = EsClient::new("es", "ns", responding(200, ""));
        assert!(client.index_exists("app-000001").unwrap());

        let client = EsClient::new("es", "ns", responding(403, "forbidden"));
        assert!(client.index_exists("app-000001").is_err());
    }

    #[test]
    fn set_send_request_fn_replaces_transport() {
        let mut client = EsClient::new("es", "ns", responding(500, ""));
        client.set_send_request_fn(responding(200, r#"{"status":"green"}"#));
        assert_eq!(client.cluster_health().unwrap(), "green");
    }
}
