//! Secret catalog: which secrets to read and where each field is written
//!
//! A catalog describes the maximal set of credential files. Deployments may
//! omit individual fields (e.g. the proxy session secret), so a field absent
//! from its secret is skipped rather than treated as an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path};

use serde::Deserialize;

use kibana_common::{KIBANA_PROXY_SECRET_NAME, KIBANA_SECRET_NAME};

use crate::{Error, Result};

/// One secret and the mapping from its data keys to output filenames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Name of the secret in the store
    pub store_name: String,
    /// Secret data key -> output filename (relative to the working directory)
    pub fields: BTreeMap<String, String>,
}

impl CatalogEntry {
    /// Create an entry from `(key, file)` pairs
    pub fn new<K, F>(
        store_name: impl Into<String>,
        fields: impl IntoIterator<Item = (K, F)>,
    ) -> Self
    where
        K: Into<String>,
        F: Into<String>,
    {
        Self {
            store_name: store_name.into(),
            fields: fields
                .into_iter()
                .map(|(k, f)| (k.into(), f.into()))
                .collect(),
        }
    }
}

/// Immutable set of catalog entries, injected into the extractor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, BTreeMap<String, String>>")]
pub struct SecretCatalog {
    entries: Vec<CatalogEntry>,
}

impl SecretCatalog {
    /// Build a catalog, rejecting empty entries and overlapping output files
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::config("secret catalog has no entries"));
        }

        let mut names = BTreeSet::new();
        let mut files = BTreeSet::new();
        for entry in &entries {
            if !names.insert(entry.store_name.as_str()) {
                return Err(Error::config(format!(
                    "secret {} listed more than once",
                    entry.store_name
                )));
            }
            if entry.fields.is_empty() {
                return Err(Error::config(format!(
                    "secret {} declares no fields",
                    entry.store_name
                )));
            }
            for file in entry.fields.values() {
                if !is_relative_file_name(file) {
                    return Err(Error::config(format!(
                        "output file {} must be a relative path inside the working directory",
                        file
                    )));
                }
                if !files.insert(file.as_str()) {
                    return Err(Error::config(format!(
                        "output file {} is claimed by more than one field",
                        file
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    /// The built-in Kibana catalog
    pub fn kibana() -> Self {
        Self {
            entries: vec![
                CatalogEntry::new(
                    KIBANA_SECRET_NAME,
                    [
                        ("ca", "ca.crt"),
                        ("key", "system.logging.kibana.key"),
                        ("cert", "system.logging.kibana.crt"),
                    ],
                ),
                CatalogEntry::new(
                    KIBANA_PROXY_SECRET_NAME,
                    [
                        ("server-key", "kibana-internal.key"),
                        ("server-cert", "kibana-internal.crt"),
                        ("session-secret", "kibana-session-secret"),
                    ],
                ),
            ],
        }
    }

    /// Load a catalog from a JSON file of `{"secret": {"key": "file"}}`
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read catalog {}: {}", path.display(), e))
        })?;
        Self::from_json(&data)
            .map_err(|e| Error::config(format!("invalid catalog {}: {}", path.display(), e)))
    }

    /// Parse a catalog from its JSON form
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| Error::config(e.to_string()))
    }

    /// Catalog entries in declaration order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by secret name
    pub fn entry(&self, store_name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.store_name == store_name)
    }
}

/// Whether `file` is non-empty, relative, and made of plain components only
pub(crate) fn is_relative_file_name(file: &str) -> bool {
    let mut components = Path::new(file).components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

impl Default for SecretCatalog {
    fn default() -> Self {
        Self::kibana()
    }
}

impl TryFrom<BTreeMap<String, BTreeMap<String, String>>> for SecretCatalog {
    type Error = Error;

    fn try_from(raw: BTreeMap<String, BTreeMap<String, String>>) -> Result<Self> {
        Self::new(
            raw.into_iter()
                .map(|(name, fields)| CatalogEntry::new(name, fields))
                .collect(),
        )
    }
}
