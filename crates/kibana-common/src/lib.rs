//! Common types for the Kibana credential tooling: errors, logging, and
//! Kubernetes client helpers

#![deny(missing_docs)]

pub mod error;
pub mod kube_utils;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Namespace the cluster logging stack (and its Kibana secrets) lives in
pub const DEFAULT_LOGGING_NAMESPACE: &str = "openshift-logging";

/// Secret holding the Kibana client certificate, key, and CA
pub const KIBANA_SECRET_NAME: &str = "kibana";

/// Secret holding the Kibana OAuth proxy serving certificate and session secret
pub const KIBANA_PROXY_SECRET_NAME: &str = "kibana-proxy";
