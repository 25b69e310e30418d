//! Credential extraction: secrets in the store -> files in the working directory
//!
//! Extraction is not transactional. A failure aborts the remaining fields of
//! that secret, but files already written stay in place.

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Secret;
use tracing::{debug, info, warn};

use crate::catalog::SecretCatalog;
use crate::fingerprint::fingerprint;
use crate::store::SecretStore;
use crate::writer::FileWriter;
use crate::{Error, Result};

/// Materializes every field of a [`SecretCatalog`] into files
pub struct CredentialExtractor {
    store: Arc<dyn SecretStore>,
    writer: Arc<dyn FileWriter>,
    namespace: String,
    catalog: SecretCatalog,
}

impl CredentialExtractor {
    /// Create an extractor reading secrets from `namespace`
    pub fn new(
        store: Arc<dyn SecretStore>,
        writer: Arc<dyn FileWriter>,
        namespace: impl Into<String>,
        catalog: SecretCatalog,
    ) -> Self {
        Self {
            store,
            writer,
            namespace: namespace.into(),
            catalog,
        }
    }

    /// The catalog this extractor materializes
    pub fn catalog(&self) -> &SecretCatalog {
        &self.catalog
    }

    /// Extract every catalog entry, stopping at the first failure
    ///
    /// The error is wrapped with the secret name; use
    /// [`Error::is_not_found`] to tell a missing secret apart.
    pub async fn extract_all(&self) -> Result<()> {
        for entry in self.catalog.entries() {
            self.extract_entry(&entry.store_name, &entry.fields)
                .await
                .map_err(|e| Error::Secret {
                    name: entry.store_name.clone(),
                    source: Box::new(e),
                })?;
        }

        info!(
            namespace = %self.namespace,
            secrets = self.catalog.entries().len(),
            "extracted credentials"
        );
        Ok(())
    }

    /// Extract the given fields of one secret
    pub async fn extract_entry(
        &self,
        store_name: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<()> {
        for (key, output_file) in fields {
            self.extract_field(store_name, key, output_file)
                .await
                .map_err(|e| Error::Field {
                    key: key.clone(),
                    path: output_file.clone(),
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    /// Write one secret field to `output_file`
    ///
    /// A missing secret returns [`Error::NotFound`] as-is. A key absent from
    /// an existing secret is logged and skipped.
    pub async fn extract_field(
        &self,
        store_name: &str,
        key: &str,
        output_file: &str,
    ) -> Result<()> {
        let secret = self.fetch(store_name).await?;

        let Some(value) = secret.data.as_ref().and_then(|d| d.get(key)) else {
            warn!(
                secret = %store_name,
                namespace = %self.namespace,
                key = %key,
                "no secret data found for key, skipping"
            );
            return Ok(());
        };

        self.writer.write_file(output_file, &value.0).await?;
        debug!(secret = %store_name, key = %key, path = %output_file, "extracted secret key");
        Ok(())
    }

    /// Fingerprint a secret's current content
    ///
    /// A missing secret is the "no credential yet" state and yields `""`.
    pub async fn fingerprint_secret(&self, store_name: &str) -> Result<String> {
        match self.fetch(store_name).await {
            Ok(secret) => Ok(fingerprint(Some(&secret))),
            Err(e) if e.is_not_found() => Ok(fingerprint(None)),
            Err(e) => Err(e),
        }
    }

    /// Fingerprints of every catalog secret, keyed by secret name
    pub async fn fingerprints(&self) -> Result<BTreeMap<String, String>> {
        let mut result = BTreeMap::new();
        for entry in self.catalog.entries() {
            let hash = self.fingerprint_secret(&entry.store_name).await?;
            result.insert(entry.store_name.clone(), hash);
        }
        Ok(result)
    }

    async fn fetch(&self, store_name: &str) -> Result<Secret> {
        match self.store.get(&self.namespace, store_name).await {
            Ok(secret) => Ok(secret),
            Err(e) if e.is_not_found() => Err(e),
            Err(e) => Err(Error::Store {
                name: store_name.to_string(),
                namespace: self.namespace.clone(),
                source: Box::new(e),
            }),
        }
    }
}
