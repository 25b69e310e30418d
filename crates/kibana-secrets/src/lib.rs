//! Kibana credential materialization
//!
//! Reads the `kibana` and `kibana-proxy` Secrets, writes their certificate,
//! key, and session fields to files in a working directory, and computes
//! content fingerprints so a reconciler can detect credential rotation.

#![deny(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fingerprint;
pub mod store;
pub mod writer;

pub use catalog::{CatalogEntry, SecretCatalog};
pub use config::ExtractorConfig;
pub use error::{Error, Result};
pub use extractor::CredentialExtractor;
pub use fingerprint::fingerprint;
pub use store::{KubeSecretStore, SecretStore};
pub use writer::{FileWriter, WorkingDir};
