//! Secret Store: read access to namespaced Kubernetes Secrets
//!
//! The extractor only ever reads. Absence is reported as
//! [`Error::NotFound`] so callers can tell it apart from API failures.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::Api;
use kube::Client;
use tracing::trace;

#[cfg(test)]
use mockall::automock;

use crate::{Error, Result};

/// Trait abstracting secret reads so tests can run without an API server
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret, returning [`Error::NotFound`] if it doesn't exist
    async fn get(&self, namespace: &str, name: &str) -> Result<Secret>;
}

/// Secret store backed by the Kubernetes API
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Create a new KubeSecretStore
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Secret> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        match secrets.get(name).await {
            Ok(secret) => {
                trace!(secret = %name, namespace = %namespace, "fetched secret");
                Ok(secret)
            }
            Err(kube::Error::Api(e)) if e.code == 404 => Err(Error::not_found(name, namespace)),
            Err(e) => Err(e.into()),
        }
    }
}
