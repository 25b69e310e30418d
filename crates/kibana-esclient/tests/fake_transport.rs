//! Drives EsClient through the ordered fake transport

use std::sync::Arc;

use http::Method;
use serde_json::json;

use kibana_esclient::fake::{new_fake_client, FakeChatter, FakeResponse};
use kibana_esclient::EsError;

#[test]
fn search_is_answered_once_then_reports_missing_response() {
    let chatter = Arc::new(FakeChatter::new([(
        "/idx/_search",
        vec![FakeResponse::new(200, "{}")],
    )]));
    let client = new_fake_client("elasticsearch", "openshift-logging", chatter.clone());

    let query = json!({"query": {"match_all": {}}});
    let body = client.search("idx", &query).unwrap();
    assert!(body.is_empty());

    let captured = chatter.get_request("/idx/_search").unwrap();
    assert_eq!(captured.seq_no, 1);
    assert_eq!(captured.method, Method::POST);
    assert_eq!(captured.body, query.to_string());

    let err = client.search("idx", &query).unwrap_err();
    assert!(matches!(err, EsError::NoFakeResponse { ref uri, .. } if uri == "/idx/_search"));
}

#[test]
fn calls_to_different_endpoints_are_ordered_globally() {
    let chatter = Arc::new(FakeChatter::new([
        ("/a", vec![FakeResponse::new(200, "{}")]),
        ("/b", vec![FakeResponse::new(200, "{}")]),
    ]));
    let client = new_fake_client("elasticsearch", "openshift-logging", chatter.clone());

    client.send(Method::PUT, "/a", r#"{"settings":{}}"#).unwrap();
    client.send(Method::GET, "/b", "").unwrap();

    let a = chatter.get_request("/a").unwrap();
    let b = chatter.get_request("/b").unwrap();
    assert_eq!((a.seq_no, b.seq_no), (1, 2));
    assert!(chatter.get_request("/a").is_none());
}

#[test]
fn client_operations_use_scripted_statuses() {
    let chatter = Arc::new(FakeChatter::new([
        (
            "/_cluster/health",
            vec![FakeResponse::new(200, r#"{"status":"green"}"#)],
        ),
        ("/app-000001", vec![FakeResponse::new(404, "")]),
        ("/audit-000001", vec![FakeResponse::new(200, "")]),
    ]));
    let client = new_fake_client("elasticsearch", "openshift-logging", chatter.clone());

    assert_eq!(client.cluster_health().unwrap(), "green");
    assert!(!client.index_exists("app-000001").unwrap());
    assert!(client.index_exists("audit-000001").unwrap());

    assert_eq!(chatter.get_request("/_cluster/health").unwrap().seq_no, 1);
    assert_eq!(chatter.get_request("/app-000001").unwrap().method, Method::HEAD);
    assert_eq!(chatter.get_request("/audit-000001").unwrap().seq_no, 3);
}

#[test]
fn scripted_transport_error_surfaces_from_client() {
    let chatter = Arc::new(FakeChatter::new([(
        "/_cluster/health",
        vec![FakeResponse::error(EsError::transport(
            "/_cluster/health",
            "connection refused",
        ))],
    )]));
    let client = new_fake_client("elasticsearch", "openshift-logging", chatter.clone());

    let err = client.cluster_health().unwrap_err();
    assert!(matches!(
        err,
        EsError::Transport { ref message, .. } if message == "connection refused"
    ));
    assert_eq!(chatter.pending_requests("/_cluster/health"), 1);
}
