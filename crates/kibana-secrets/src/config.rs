//! Extractor configuration from the process environment
//!
//! Environment access goes through [`ExtractorEnv`] so tests don't touch
//! global state.

use std::path::PathBuf;

use kibana_common::DEFAULT_LOGGING_NAMESPACE;

use crate::catalog::SecretCatalog;
use crate::Result;

/// Namespace the secrets are read from
pub const NAMESPACE_ENV: &str = "KIBANA_NAMESPACE";
/// Directory credential files are written into
pub const WORKING_DIR_ENV: &str = "KIBANA_WORKING_DIR";
/// Optional path to a JSON catalog replacing the built-in one
pub const CATALOG_ENV: &str = "KIBANA_SECRET_CATALOG";

/// Trait for reading extractor settings from the environment
#[cfg_attr(test, mockall::automock)]
pub trait ExtractorEnv: Send + Sync {
    /// Look up a variable, `None` if unset or empty
    fn var(&self, name: &str) -> Option<String>;
}

/// Default implementation that reads from environment variables
#[derive(Clone, Default)]
pub struct OsEnv;

impl ExtractorEnv for OsEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// Resolved extractor settings
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Namespace holding the catalog secrets
    pub namespace: String,
    /// Directory credential files are written into
    pub working_dir: PathBuf,
    /// Secrets and fields to extract
    pub catalog: SecretCatalog,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_LOGGING_NAMESPACE.to_string(),
            working_dir: PathBuf::from("."),
            catalog: SecretCatalog::kibana(),
        }
    }
}

/// Settings given explicitly (e.g. on the command line), taking precedence
/// over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Namespace holding the catalog secrets
    pub namespace: Option<String>,
    /// Directory credential files are written into
    pub working_dir: Option<PathBuf>,
    /// JSON catalog file
    pub catalog: Option<PathBuf>,
}

impl ExtractorConfig {
    /// Build the config from environment variables, falling back to defaults
    pub fn from_env(env: &dyn ExtractorEnv) -> Result<Self> {
        Self::resolve(env, &ConfigOverrides::default())
    }

    /// Build the config from overrides, then the environment, then defaults
    ///
    /// Only the winning catalog source is read, so a broken
    /// `KIBANA_SECRET_CATALOG` doesn't matter when a catalog override is set.
    pub fn resolve(env: &dyn ExtractorEnv, overrides: &ConfigOverrides) -> Result<Self> {
        let defaults = Self::default();

        let catalog_path = overrides
            .catalog
            .clone()
            .or_else(|| env.var(CATALOG_ENV).map(PathBuf::from));
        let catalog = match catalog_path {
            Some(path) => SecretCatalog::from_file(&path)?,
            None => defaults.catalog,
        };

        Ok(Self {
            namespace: overrides
                .namespace
                .clone()
                .or_else(|| env.var(NAMESPACE_ENV))
                .unwrap_or(defaults.namespace),
            working_dir: overrides
                .working_dir
                .clone()
                .or_else(|| env.var(WORKING_DIR_ENV).map(PathBuf::from))
                .unwrap_or(defaults.working_dir),
            catalog,
        })
    }
}
